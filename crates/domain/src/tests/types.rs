// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BikeStatus, BikeType, DisputeStatus, DomainError, MembershipTier, PaymentStatus, Role,
    StationStatus,
};
use std::str::FromStr;

#[test]
fn test_dispute_status_transitions() {
    assert!(DisputeStatus::Open.can_transition_to(DisputeStatus::UnderReview));
    assert!(DisputeStatus::Open.can_transition_to(DisputeStatus::Resolved));
    assert!(DisputeStatus::Open.can_transition_to(DisputeStatus::Rejected));
    assert!(DisputeStatus::UnderReview.can_transition_to(DisputeStatus::Resolved));
    assert!(DisputeStatus::UnderReview.can_transition_to(DisputeStatus::Rejected));

    assert!(!DisputeStatus::UnderReview.can_transition_to(DisputeStatus::Open));
    assert!(!DisputeStatus::Resolved.can_transition_to(DisputeStatus::Rejected));
    assert!(!DisputeStatus::Rejected.can_transition_to(DisputeStatus::Open));
    assert!(!DisputeStatus::Open.can_transition_to(DisputeStatus::Open));
}

#[test]
fn test_dispute_status_terminal_states() {
    assert!(DisputeStatus::Resolved.is_terminal());
    assert!(DisputeStatus::Rejected.is_terminal());
    assert!(!DisputeStatus::Open.is_terminal());
    assert!(!DisputeStatus::UnderReview.is_terminal());
}

#[test]
fn test_payment_status_capabilities() {
    assert!(PaymentStatus::Pending.is_settleable());
    assert!(!PaymentStatus::Paid.is_settleable());
    assert!(!PaymentStatus::Failed.is_settleable());
    assert!(PaymentStatus::Paid.has_receipt());
    assert!(PaymentStatus::Adjusted.has_receipt());
    assert!(!PaymentStatus::Pending.has_receipt());
    assert!(!PaymentStatus::Failed.has_receipt());
}

#[test]
fn test_bike_status_checkout_rule() {
    assert!(BikeStatus::Available.can_checkout());
    assert!(BikeStatus::Reserved.can_checkout());
    assert!(!BikeStatus::InUse.can_checkout());
    assert!(!BikeStatus::Maintenance.can_checkout());
}

#[test]
fn test_station_status_toggle() {
    assert_eq!(StationStatus::Active.toggled(), StationStatus::OutOfService);
    assert_eq!(StationStatus::OutOfService.toggled(), StationStatus::Active);
}

#[test]
fn test_wire_names_round_trip_through_from_str() {
    assert_eq!(Role::from_str("OPERATOR").unwrap(), Role::Operator);
    assert_eq!(BikeType::from_str("E_BIKE").unwrap(), BikeType::EBike);
    assert_eq!(
        StationStatus::from_str(StationStatus::OutOfService.as_str()).unwrap(),
        StationStatus::OutOfService
    );
    assert_eq!(
        MembershipTier::from_str("PREMIUM").unwrap(),
        MembershipTier::Premium
    );
    assert_eq!(
        DisputeStatus::UnderReview.to_string(),
        String::from("UNDER_REVIEW")
    );
}

#[test]
fn test_unknown_enum_value_is_rejected() {
    let result: Result<Role, DomainError> = Role::from_str("ADMIN");
    assert!(matches!(
        result,
        Err(DomainError::InvalidEnumValue { kind: "role", .. })
    ));
}

#[test]
fn test_enum_serde_uses_screaming_snake_case() {
    let json: String = serde_json::to_string(&BikeStatus::InUse).unwrap();
    assert_eq!(json, "\"IN_USE\"");

    let status: StationStatus = serde_json::from_str("\"OUT_OF_SERVICE\"").unwrap();
    assert_eq!(status, StationStatus::OutOfService);
}
