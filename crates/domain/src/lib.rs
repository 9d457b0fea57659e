// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod account;
mod billing;
mod dispute;
mod error;
mod fleet;
mod history;
mod pricing;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use account::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser, SessionUser};
pub use billing::{
    BALANCE_EPSILON, BillingLedgerEntry, BillingPeriod, ChargeLine, PaymentResult,
    SAVED_PAYMENT_METHOD, SettleRequest, TripSummary, balance_changed, compute_pending_balance,
    select_entry,
};
pub use dispute::{
    DisputeDraft, DisputeResolution, DisputeSubmission, DisputeTicket, ResolutionDraft,
};
pub use error::DomainError;
pub use fleet::{
    Bike, CheckoutRequest, CreateBikeRequest, MoveRequest, RESERVATION_MINUTES,
    ReservationRequest, ReturnRequest, Station, StationInventory, StationLoad,
    StationStatusUpdate, find_bike, find_station, station_inventory, validate_checkout,
    validate_move, validate_reservation, validate_return, validate_ride_metrics,
};
pub use history::{RideHistoryFilter, RideHistoryRecord, RideStatistics};
pub use pricing::{ExampleCost, PlanForm, PlanUpsertRequest, PricingPlan};
pub use types::{
    BikeStatus, BikeType, DisputeStatus, MembershipTier, PaymentStatus, RideStatus, Role,
    StationStatus,
};
pub use validation::{optional_text, require_text};
