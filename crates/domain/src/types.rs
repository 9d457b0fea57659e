// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role carried by an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A customer who rides bikes and pays for trips.
    Rider,
    /// Staff who manage stations, bikes, plans and disputes.
    Operator,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RIDER" => Ok(Self::Rider),
            "OPERATOR" => Ok(Self::Operator),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rider => "RIDER",
            Self::Operator => "OPERATOR",
        }
    }

    /// Returns whether this role is the operator role.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator)
    }
}

/// Operational status of a docking station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatus {
    /// The station accepts reservations and returns.
    Active,
    /// The station is closed for reservations and returns.
    OutOfService,
}

impl FromStr for StationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "OUT_OF_SERVICE" => Ok(Self::OutOfService),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "station status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StationStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::OutOfService => "OUT_OF_SERVICE",
        }
    }

    /// Returns the status an operator toggle moves to.
    #[must_use]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::OutOfService,
            Self::OutOfService => Self::Active,
        }
    }
}

/// Kind of bike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeType {
    /// A pedal bike.
    Standard,
    /// An electric-assist bike.
    EBike,
}

impl FromStr for BikeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Self::Standard),
            "E_BIKE" => Ok(Self::EBike),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "bike type",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BikeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BikeType {
    /// Converts this bike type to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::EBike => "E_BIKE",
        }
    }
}

/// Availability status of a bike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeStatus {
    /// Docked and free to reserve or check out.
    Available,
    /// Held for a rider.
    Reserved,
    /// Out on a ride.
    InUse,
    /// Withdrawn for servicing.
    Maintenance,
}

impl FromStr for BikeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "RESERVED" => Ok(Self::Reserved),
            "IN_USE" => Ok(Self::InUse),
            "MAINTENANCE" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "bike status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BikeStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::InUse => "IN_USE",
            Self::Maintenance => "MAINTENANCE",
        }
    }

    /// Returns whether a bike in this status may be checked out.
    #[must_use]
    pub const fn can_checkout(&self) -> bool {
        matches!(self, Self::Available | Self::Reserved)
    }
}

/// Payment state of a billing ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Not yet settled.
    Pending,
    /// Settled.
    Paid,
    /// A settlement attempt failed.
    Failed,
    /// Corrected by a dispute adjustment.
    Adjusted,
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            "ADJUSTED" => Ok(Self::Adjusted),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "payment status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PaymentStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Adjusted => "ADJUSTED",
        }
    }

    /// Returns whether an entry in this status can be settled.
    #[must_use]
    pub const fn is_settleable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns whether a receipt exists for an entry in this status.
    #[must_use]
    pub const fn has_receipt(&self) -> bool {
        matches!(self, Self::Paid | Self::Adjusted)
    }
}

/// Lifecycle state of a dispute ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Submitted by a rider and awaiting review.
    Open,
    /// Picked up by an operator.
    UnderReview,
    /// Approved. An adjustment ledger entry was created.
    Resolved,
    /// Declined.
    Rejected,
}

impl FromStr for DisputeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "UNDER_REVIEW" => Ok(Self::UnderReview),
            "RESOLVED" => Ok(Self::Resolved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "dispute status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DisputeStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Resolved => "RESOLVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → `UnderReview`
    /// - Open | `UnderReview` → Resolved
    /// - Open | `UnderReview` → Rejected
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::UnderReview)
                | (Self::Open | Self::UnderReview, Self::Resolved | Self::Rejected)
        )
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

/// Membership tier a pricing plan applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipTier {
    /// Pay-as-you-go riders.
    #[default]
    None,
    /// Standard members.
    Standard,
    /// Premium members.
    Premium,
}

impl FromStr for MembershipTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "STANDARD" => Ok(Self::Standard),
            "PREMIUM" => Ok(Self::Premium),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "membership tier",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MembershipTier {
    /// Converts this tier to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
        }
    }
}

/// Status of a ride history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    /// The ride ended with a return.
    Completed,
    /// The bike is still out.
    InProgress,
    /// The ride was cancelled.
    Cancelled,
}

impl FromStr for RideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETED" => Ok(Self::Completed),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "ride status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RideStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::InProgress => "IN_PROGRESS",
            Self::Cancelled => "CANCELLED",
        }
    }
}
