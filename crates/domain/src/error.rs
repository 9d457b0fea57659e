// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors produced by local validation before any network call is made.
///
/// The `Display` output of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field was empty after trimming.
    MissingField(&'static str),
    /// An enum value received from the backend or the user is unknown.
    InvalidEnumValue {
        /// The kind of value (e.g., "station status").
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The dispute reason was empty.
    MissingDisputeReason,
    /// An approval was attempted without a positive adjustment amount.
    NonPositiveAdjustment,
    /// The plan name was empty.
    MissingPlanName,
    /// The base fee did not parse as a finite number.
    InvalidBaseFee,
    /// The per-minute rate did not parse as a finite number.
    InvalidPerMinuteRate,
    /// The e-bike surcharge did not parse as a finite number.
    InvalidEbikeSurcharge,
    /// A date-time input could not be parsed.
    InvalidDateTime {
        /// The field label.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// A date input could not be parsed.
    InvalidDate {
        /// The field label.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The effective end of a plan precedes its effective start.
    EffectiveRangeInverted,
    /// A history filter start date is after its end date.
    HistoryRangeInverted,
    /// Ride metrics supplied for a return are negative or not finite.
    InvalidRideMetrics,
    /// No billing entry is selected.
    NoActiveEntry,
    /// No authenticated user is available.
    NotSignedIn,
    /// The action requires the operator role.
    OperatorOnly {
        /// Description of the attempted action.
        action: &'static str,
    },
    /// The action requires the rider role.
    RiderOnly {
        /// Description of the attempted action.
        action: &'static str,
    },
    /// The referenced station is not in the loaded station list.
    StationNotFound(i64),
    /// The referenced bike is not in the loaded bike list.
    BikeNotFound(String),
    /// A reservation was attempted at an out-of-service station.
    ReservationStationOutOfService,
    /// A reservation was attempted at a station with no available bike.
    NoBikesAvailable,
    /// A return was attempted at an out-of-service station.
    ReturnStationOutOfService,
    /// A return was attempted at a station with no free dock.
    ReturnStationFull,
    /// A move names the same station as source and destination.
    SameStationMove,
    /// A move source station has no available bike.
    SourceStationEmpty,
    /// A move destination station has no free dock.
    DestinationStationFull,
    /// The bike is not in a state that allows checkout.
    BikeNotCheckoutable {
        /// The bike identifier.
        bike_id: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required."),
            Self::InvalidEnumValue { kind, value } => write!(f, "Invalid {kind}: {value}"),
            Self::MissingDisputeReason => {
                write!(f, "Please describe the issue you want to dispute.")
            }
            Self::NonPositiveAdjustment => {
                write!(f, "Enter a positive adjustment amount before approving.")
            }
            Self::MissingPlanName => write!(f, "Plan name is required."),
            Self::InvalidBaseFee => write!(f, "Base fee must be a numeric value."),
            Self::InvalidPerMinuteRate => write!(f, "Per-minute rate must be a numeric value."),
            Self::InvalidEbikeSurcharge => write!(f, "E-bike surcharge must be a numeric value."),
            Self::InvalidDateTime { field, value } => write!(
                f,
                "{field} must be a date and time (YYYY-MM-DDTHH:MM), got '{value}'."
            ),
            Self::InvalidDate { field, value } => write!(
                f,
                "{field} must be a date (YYYY-MM-DD) or date and time, got '{value}'."
            ),
            Self::EffectiveRangeInverted => {
                write!(f, "Effective to must not be before effective from.")
            }
            Self::HistoryRangeInverted => write!(f, "Start date must not be after end date."),
            Self::InvalidRideMetrics => {
                write!(f, "Ride duration and distance must be non-negative numbers.")
            }
            Self::NoActiveEntry => write!(f, "Select a billing entry first."),
            Self::NotSignedIn => write!(f, "User not found. Please log in again."),
            Self::OperatorOnly { action } => write!(f, "Only operators can {action}."),
            Self::RiderOnly { action } => write!(f, "Only riders can {action}."),
            Self::StationNotFound(id) => write!(f, "Station {id} not found"),
            Self::BikeNotFound(id) => write!(f, "Bike {id} not found"),
            Self::ReservationStationOutOfService => {
                write!(f, "Cannot reserve bike from out-of-service station")
            }
            Self::NoBikesAvailable => write!(f, "No bikes available at this station"),
            Self::ReturnStationOutOfService => write!(
                f,
                "Cannot return bike to out-of-service station. Please select another nearby station."
            ),
            Self::ReturnStationFull => write!(
                f,
                "Station is full. Please return bike to another nearby station."
            ),
            Self::SameStationMove => write!(f, "Cannot move bike to the same station"),
            Self::SourceStationEmpty => {
                write!(f, "Source station has no available bikes to move")
            }
            Self::DestinationStationFull => write!(f, "Destination station has no free docks"),
            Self::BikeNotCheckoutable { bike_id } => {
                write!(f, "Bike {bike_id} is not available for checkout")
            }
        }
    }
}

impl std::error::Error for DomainError {}
