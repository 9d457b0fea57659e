// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::RideStatus;
use crate::validation::parse_optional_bound;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// One past or ongoing ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideHistoryRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub bike_id: Option<String>,
    #[serde(default)]
    pub start_station_id: Option<i64>,
    #[serde(default)]
    pub end_station_id: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    pub status: RideStatus,
    #[serde(default)]
    pub bike_type: Option<String>,
}

/// Aggregates over a rider's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideStatistics {
    #[serde(default)]
    pub total_rides: Option<i64>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub average_duration: Option<f64>,
    #[serde(default)]
    pub average_distance: Option<f64>,
    #[serde(default)]
    pub most_used_start_station: Option<i64>,
    #[serde(default)]
    pub most_used_end_station: Option<i64>,
    #[serde(default)]
    pub favorite_bike_type: Option<String>,
}

/// Optional filters for the ride history listing.
///
/// Only set fields are sent. Dates accept `YYYY-MM-DD` or a local date-time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideHistoryFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub station_id: Option<i64>,
    pub start_station_only: Option<bool>,
    pub status: Option<RideStatus>,
    pub bike_type: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl RideHistoryFilter {
    /// Checks that the date bounds parse and are ordered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDate` for an unparseable bound, or
    /// `DomainError::HistoryRangeInverted` if the start is after the end.
    pub fn validate(&self) -> Result<(), DomainError> {
        let start: Option<PrimitiveDateTime> =
            parse_optional_bound(self.start_date.as_deref(), "Start date")?;
        let end: Option<PrimitiveDateTime> =
            parse_optional_bound(self.end_date.as_deref(), "End date")?;
        if start.zip(end).is_some_and(|(from, to)| from > to) {
            return Err(DomainError::HistoryRangeInverted);
        }
        Ok(())
    }

    /// Returns whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Renders the set fields as query parameters.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                query.push((key.to_string(), value.trim().to_string()));
            }
        };
        push("startDate", self.start_date.clone());
        push("endDate", self.end_date.clone());
        push("stationId", self.station_id.map(|id| id.to_string()));
        push(
            "startStationOnly",
            self.start_station_only.map(|flag| flag.to_string()),
        );
        push("status", self.status.map(|status| status.as_str().to_string()));
        push("bikeType", self.bike_type.clone());
        push("page", self.page.map(|page| page.to_string()));
        push("size", self.size.map(|size| size.to_string()));
        query
    }
}
