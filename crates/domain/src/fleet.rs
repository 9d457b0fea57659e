// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stations, bikes, and the local preconditions checked before any
//! fleet mutation is sent to the backend.
//!
//! Every check here works on the most recently fetched station and bike
//! lists. The backend re-validates everything; these checks only spare a
//! round trip for requests that are certain to fail.

use crate::error::DomainError;
use crate::types::{BikeStatus, BikeType, StationStatus};
use serde::{Deserialize, Serialize};

/// Reservation hold time requested for every reservation.
pub const RESERVATION_MINUTES: u32 = 15;

/// A docking station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Backend station identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Number of docks.
    pub capacity: u32,
    /// Number of docked bikes.
    pub current_bike_count: u32,
    /// Operational status.
    pub status: StationStatus,
}

impl Station {
    /// Returns the number of empty docks.
    #[must_use]
    pub const fn free_docks(&self) -> u32 {
        self.capacity.saturating_sub(self.current_bike_count)
    }

    /// Returns whether the station is out of service.
    #[must_use]
    pub const fn is_out_of_service(&self) -> bool {
        matches!(self.status, StationStatus::OutOfService)
    }

    /// Classifies the station's fill level for the map legend.
    #[must_use]
    pub fn load(&self) -> StationLoad {
        StationLoad::classify(self.current_bike_count, self.capacity)
    }
}

/// Fill-level classification of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationLoad {
    /// Empty or full.
    Critical,
    /// Below 25% or above 85% full.
    Warning,
    /// Comfortably stocked.
    Healthy,
}

impl StationLoad {
    /// Classifies a dock occupancy.
    #[must_use]
    pub fn classify(current: u32, capacity: u32) -> Self {
        if current == 0 || current >= capacity {
            return Self::Critical;
        }
        let percentage: f64 = f64::from(current) / f64::from(capacity) * 100.0;
        if !(25.0..=85.0).contains(&percentage) {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    /// Returns a short label for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Healthy => "healthy",
        }
    }
}

/// A bike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    /// Backend bike identifier (a UUID).
    pub id: String,
    /// Kind of bike.
    #[serde(rename = "type")]
    pub bike_type: BikeType,
    /// Availability status.
    pub status: BikeStatus,
    /// Station the bike is docked at, if any.
    #[serde(default)]
    pub station_id: Option<i64>,
    /// Rider currently holding the reservation.
    #[serde(default)]
    pub reserved_by_user_id: Option<i64>,
    /// Rider currently riding the bike.
    #[serde(default)]
    pub current_user_id: Option<i64>,
    /// When the reservation lapses.
    #[serde(default)]
    pub reservation_expires_at: Option<String>,
}

/// Per-station bike counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationInventory {
    /// Bikes free to reserve.
    pub available: usize,
    /// Bikes held for a rider.
    pub reserved: usize,
    /// Bikes out on a ride from this station.
    pub in_use: usize,
    /// Bikes withdrawn for servicing.
    pub maintenance: usize,
}

/// Counts the bikes associated with `station_id` by status.
#[must_use]
pub fn station_inventory(bikes: &[Bike], station_id: i64) -> StationInventory {
    bikes
        .iter()
        .filter(|bike| bike.station_id == Some(station_id))
        .fold(StationInventory::default(), |mut inventory, bike| {
            match bike.status {
                BikeStatus::Available => inventory.available += 1,
                BikeStatus::Reserved => inventory.reserved += 1,
                BikeStatus::InUse => inventory.in_use += 1,
                BikeStatus::Maintenance => inventory.maintenance += 1,
            }
            inventory
        })
}

/// Body of `POST /bikes/reserve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Station to reserve from.
    pub station_id: i64,
    /// Rider making the reservation.
    pub user_id: i64,
    /// Hold time in minutes.
    pub expires_after_minutes: u32,
}

/// Body of `POST /bikes/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Bike to unlock.
    pub bike_id: String,
    /// Rider taking the bike.
    pub user_id: i64,
}

/// Body of `POST /bikes/return`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    /// Bike being docked.
    pub bike_id: String,
    /// Station receiving the bike.
    pub return_station_id: i64,
    /// Rider returning the bike.
    pub user_id: i64,
    /// Ride duration.
    pub duration_minutes: f64,
    /// Ride distance.
    pub distance_km: f64,
}

/// Body of `POST /bikes/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Bike being rebalanced.
    pub bike_id: String,
    /// Destination station.
    pub new_station_id: i64,
    /// Operator performing the move.
    pub operator_id: i64,
}

/// Body of `POST /bikes/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBikeRequest {
    /// Kind of bike to add.
    #[serde(rename = "type")]
    pub bike_type: BikeType,
    /// Station the new bike is docked at.
    pub station_id: i64,
}

/// Body of `PATCH /operator/stations/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationStatusUpdate {
    /// Target status.
    pub status: StationStatus,
}

/// Looks up a station by identifier.
///
/// # Errors
///
/// Returns `DomainError::StationNotFound` if no station has the identifier.
pub fn find_station(stations: &[Station], station_id: i64) -> Result<&Station, DomainError> {
    stations
        .iter()
        .find(|station| station.id == station_id)
        .ok_or(DomainError::StationNotFound(station_id))
}

/// Looks up a bike by identifier.
///
/// # Errors
///
/// Returns `DomainError::BikeNotFound` if no bike has the identifier.
pub fn find_bike<'a>(bikes: &'a [Bike], bike_id: &str) -> Result<&'a Bike, DomainError> {
    bikes
        .iter()
        .find(|bike| bike.id == bike_id)
        .ok_or_else(|| DomainError::BikeNotFound(bike_id.to_string()))
}

fn available_bikes_at(bikes: &[Bike], station_id: i64) -> usize {
    bikes
        .iter()
        .filter(|bike| bike.station_id == Some(station_id) && bike.status == BikeStatus::Available)
        .count()
}

/// Checks that a reservation at `station_id` can succeed.
///
/// # Errors
///
/// Returns an error if the station is unknown, out of service, or has no
/// available bike.
pub fn validate_reservation<'a>(
    stations: &'a [Station],
    bikes: &[Bike],
    station_id: i64,
) -> Result<&'a Station, DomainError> {
    let station: &Station = find_station(stations, station_id)?;
    if station.is_out_of_service() {
        return Err(DomainError::ReservationStationOutOfService);
    }
    if available_bikes_at(bikes, station_id) == 0 {
        return Err(DomainError::NoBikesAvailable);
    }
    Ok(station)
}

/// Checks that a bike can be returned to `station_id`.
///
/// # Errors
///
/// Returns an error if the station is unknown, out of service, or full.
pub fn validate_return(stations: &[Station], station_id: i64) -> Result<&Station, DomainError> {
    let station: &Station = find_station(stations, station_id)?;
    if station.is_out_of_service() {
        return Err(DomainError::ReturnStationOutOfService);
    }
    if station.free_docks() == 0 {
        return Err(DomainError::ReturnStationFull);
    }
    Ok(station)
}

/// Checks that a bike can be moved between two stations.
///
/// The same-station check runs first so that a move onto a full source
/// station reports the more specific problem.
///
/// # Returns
///
/// The source and destination stations.
///
/// # Errors
///
/// Returns an error if the stations are the same, either is unknown, the
/// source has no available bike, or the destination is full.
pub fn validate_move<'a>(
    stations: &'a [Station],
    bikes: &[Bike],
    source_station_id: i64,
    destination_station_id: i64,
) -> Result<(&'a Station, &'a Station), DomainError> {
    if source_station_id == destination_station_id {
        return Err(DomainError::SameStationMove);
    }
    let source: &Station = find_station(stations, source_station_id)?;
    let destination: &Station = find_station(stations, destination_station_id)?;
    if available_bikes_at(bikes, source_station_id) == 0 {
        return Err(DomainError::SourceStationEmpty);
    }
    if destination.free_docks() == 0 {
        return Err(DomainError::DestinationStationFull);
    }
    Ok((source, destination))
}

/// Checks that a bike can be checked out.
///
/// # Errors
///
/// Returns an error if the bike is unknown or neither available nor reserved.
pub fn validate_checkout<'a>(bikes: &'a [Bike], bike_id: &str) -> Result<&'a Bike, DomainError> {
    let bike: &Bike = find_bike(bikes, bike_id)?;
    if !bike.status.can_checkout() {
        return Err(DomainError::BikeNotCheckoutable {
            bike_id: bike.id.clone(),
        });
    }
    Ok(bike)
}

/// Validates the ride metrics reported on a return.
///
/// # Errors
///
/// Returns `DomainError::InvalidRideMetrics` if either value is negative or not finite.
pub fn validate_ride_metrics(duration_minutes: f64, distance_km: f64) -> Result<(), DomainError> {
    let valid = |value: f64| value.is_finite() && value >= 0.0;
    if !valid(duration_minutes) || !valid(distance_km) {
        return Err(DomainError::InvalidRideMetrics);
    }
    Ok(())
}
