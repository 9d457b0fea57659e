// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::DisputeStatus;
use crate::validation::{optional_text, parse_optional_amount};
use serde::{Deserialize, Serialize};

/// A rider's dispute against a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeTicket {
    pub id: i64,
    pub rider_id: i64,
    pub ledger_entry_id: i64,
    pub status: DisputeStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub evidence_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub resolution_note: Option<String>,
    /// Ledger entry created by an approved resolution.
    #[serde(default)]
    pub adjustment_entry_id: Option<i64>,
}

/// Body of `POST /prc/disputes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSubmission {
    pub ledger_entry_id: i64,
    pub reason: String,
    /// Serialized as `null` when absent.
    pub evidence_url: Option<String>,
}

/// Body of `POST /prc/disputes/{id}/resolve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeResolution {
    pub approved: bool,
    pub adjustment_amount: Option<f64>,
    pub resolution_note: Option<String>,
}

/// Unsubmitted dispute form for the active ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisputeDraft {
    /// Free-text description of the problem.
    pub reason: String,
    /// Optional link to supporting evidence.
    pub evidence_url: String,
}

impl DisputeDraft {
    /// Validates the draft and builds the submission for `ledger_entry_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingDisputeReason` if the reason is blank.
    pub fn to_submission(&self, ledger_entry_id: i64) -> Result<DisputeSubmission, DomainError> {
        let reason: String =
            optional_text(&self.reason).ok_or(DomainError::MissingDisputeReason)?;
        Ok(DisputeSubmission {
            ledger_entry_id,
            reason,
            evidence_url: optional_text(&self.evidence_url),
        })
    }
}

/// Operator's in-progress resolution of one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionDraft {
    /// Adjustment amount as typed.
    pub amount: String,
    /// Optional note recorded on the ticket.
    pub note: String,
}

impl ResolutionDraft {
    /// Validates the draft and builds the resolution request.
    ///
    /// Approval requires a positive, finite adjustment amount. Rejection
    /// requires none, and any typed amount is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonPositiveAdjustment` if an approval carries no
    /// positive amount.
    pub fn to_resolution(&self, approved: bool) -> Result<DisputeResolution, DomainError> {
        let adjustment_amount: Option<f64> = if approved {
            let amount: Option<f64> =
                parse_optional_amount(&self.amount, DomainError::NonPositiveAdjustment)?;
            match amount {
                Some(value) if value > 0.0 => Some(value),
                _ => return Err(DomainError::NonPositiveAdjustment),
            }
        } else {
            None
        };
        Ok(DisputeResolution {
            approved,
            adjustment_amount,
            resolution_note: optional_text(&self.note),
        })
    }
}
