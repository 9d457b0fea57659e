// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::PaymentStatus;
use crate::validation::{format_date_time, parse_optional_bound};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::PrimitiveDateTime;

/// Payment method used for every settlement from this client.
pub const SAVED_PAYMENT_METHOD: &str = "saved-default";

/// Change in pending balance below which the session is not updated.
pub const BALANCE_EPSILON: f64 = 0.005;

/// One line of a trip charge breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeLine {
    /// Charge code (e.g., `BASE_FEE`, `E_BIKE_SURCHARGE`).
    pub code: String,
    /// Amount charged.
    pub amount: f64,
    /// Free-form annotations.
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

/// A rider's billing ledger entry for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingLedgerEntry {
    pub ledger_entry_id: i64,
    #[serde(default)]
    pub plan_version_id: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
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
    pub duration_minutes: i64,
    #[serde(default)]
    pub distance_km: f64,
    pub total: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub adjustment_of_entry_id: Option<i64>,
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl BillingLedgerEntry {
    /// Returns whether this entry can be settled.
    #[must_use]
    pub const fn can_settle(&self) -> bool {
        self.payment_status.is_settleable()
    }

    /// Returns whether a receipt can be downloaded for this entry.
    #[must_use]
    pub const fn can_download_receipt(&self) -> bool {
        self.payment_status.has_receipt()
    }
}

/// Itemized breakdown of a single trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[serde(default)]
    pub bike_id: Option<String>,
    #[serde(default)]
    pub rider_id: Option<i64>,
    #[serde(default)]
    pub start_station_id: Option<i64>,
    #[serde(default)]
    pub end_station_id: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub distance_km: f64,
    pub total: f64,
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    #[serde(default)]
    pub plan_name: Option<String>,
}

/// Body of `POST /prc/billing/settle/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    /// Opaque payment method token.
    pub payment_method_token: String,
}

impl Default for SettleRequest {
    fn default() -> Self {
        Self {
            payment_method_token: String::from(SAVED_PAYMENT_METHOD),
        }
    }
}

/// Outcome reported by the payment processor.
///
/// `success == false` is a business failure, not a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl PaymentResult {
    /// Returns the message shown to the user for this outcome.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.success {
            return String::from("Payment processed successfully.");
        }
        match self.failure_reason.as_deref() {
            Some(reason) if !reason.trim().is_empty() => format!("Payment failed: {reason}"),
            _ => String::from("Payment could not be processed."),
        }
    }
}

/// Optional `start`/`end` bounds for billing history and ledger export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingPeriod {
    /// Inclusive lower bound, ISO date-time.
    pub start: Option<String>,
    /// Inclusive upper bound, ISO date-time.
    pub end: Option<String>,
}

impl BillingPeriod {
    /// Builds a period from raw input, validating both bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound does not parse or `start` is after `end`.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self, DomainError> {
        let start_bound: Option<PrimitiveDateTime> = parse_optional_bound(start, "Start")?;
        let end_bound: Option<PrimitiveDateTime> = parse_optional_bound(end, "End")?;
        if start_bound
            .zip(end_bound)
            .is_some_and(|(from, to)| from > to)
        {
            return Err(DomainError::HistoryRangeInverted);
        }
        Ok(Self {
            start: start_bound.map(format_date_time),
            end: end_bound.map(format_date_time),
        })
    }

    /// Renders the set bounds as query parameters.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = Vec::new();
        if let Some(start) = &self.start {
            query.push((String::from("start"), start.clone()));
        }
        if let Some(end) = &self.end {
            query.push((String::from("end"), end.clone()));
        }
        query
    }
}

/// Sums the totals of `PENDING` entries, rounded to cents.
#[must_use]
pub fn compute_pending_balance(entries: &[BillingLedgerEntry]) -> f64 {
    let sum: f64 = entries
        .iter()
        .filter(|entry| entry.payment_status == PaymentStatus::Pending)
        .map(|entry| entry.total)
        .sum();
    (sum * 100.0).round() / 100.0
}

/// Returns whether a balance change is large enough to publish.
#[must_use]
pub fn balance_changed(current: Option<f64>, next: f64) -> bool {
    current.is_none_or(|value| (value - next).abs() >= BALANCE_EPSILON)
}

/// Picks the entry to keep selected after `entries` was refetched.
///
/// The previous selection survives if it is still present. Otherwise the
/// first entry is selected, or nothing if the list is empty.
#[must_use]
pub fn select_entry(entries: &[BillingLedgerEntry], previous: Option<i64>) -> Option<i64> {
    previous
        .filter(|id| entries.iter().any(|entry| entry.ledger_entry_id == *id))
        .or_else(|| entries.first().map(|entry| entry.ledger_entry_id))
}
