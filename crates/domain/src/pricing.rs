// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::MembershipTier;
use crate::validation::{
    normalize_date_time, optional_text, parse_amount, parse_optional_amount, to_date_time_input,
};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// Illustrative trip cost published with a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleCost {
    pub duration_minutes: u32,
    pub ebike: bool,
    pub estimated_total: f64,
}

/// A versioned pricing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub plan_version_id: String,
    pub plan_name: String,
    pub base_fee: f64,
    pub per_minute_rate: f64,
    #[serde(default)]
    pub ebike_surcharge: Option<f64>,
    #[serde(default)]
    pub effective_from: Option<String>,
    #[serde(default)]
    pub effective_to: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example_costs: Vec<ExampleCost>,
}

/// Body of the plan create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpsertRequest {
    pub plan_name: String,
    pub base_fee: f64,
    pub per_minute_rate: f64,
    pub ebike_surcharge: Option<f64>,
    pub membership_tier: MembershipTier,
    pub city_id: Option<String>,
    pub effective_from: Option<String>,
    pub effective_to: Option<String>,
    pub description: Option<String>,
    pub publish: bool,
}

/// The plan editor form, holding raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanForm {
    pub plan_name: String,
    pub base_fee: String,
    pub per_minute_rate: String,
    pub ebike_surcharge: String,
    pub membership_tier: MembershipTier,
    pub city_id: String,
    /// `YYYY-MM-DDTHH:MM` or with seconds; blank for none.
    pub effective_from: String,
    /// `YYYY-MM-DDTHH:MM` or with seconds; blank for none.
    pub effective_to: String,
    pub description: String,
    pub publish: bool,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            plan_name: String::new(),
            base_fee: String::new(),
            per_minute_rate: String::new(),
            ebike_surcharge: String::new(),
            membership_tier: MembershipTier::None,
            city_id: String::new(),
            effective_from: String::new(),
            effective_to: String::new(),
            description: String::new(),
            publish: true,
        }
    }
}

impl PlanForm {
    /// Prefills the form from an existing plan for editing.
    ///
    /// Tier, city and publish flag are not part of the published plan and
    /// keep their defaults.
    #[must_use]
    pub fn from_plan(plan: &PricingPlan) -> Self {
        Self {
            plan_name: plan.plan_name.clone(),
            base_fee: plan.base_fee.to_string(),
            per_minute_rate: plan.per_minute_rate.to_string(),
            ebike_surcharge: plan
                .ebike_surcharge
                .map(|value| value.to_string())
                .unwrap_or_default(),
            effective_from: to_date_time_input(plan.effective_from.as_deref()),
            effective_to: to_date_time_input(plan.effective_to.as_deref()),
            description: plan.description.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validates the form and builds the upsert request.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, checked in this order: plan
    /// name, base fee, per-minute rate, e-bike surcharge, effective dates.
    pub fn to_request(&self) -> Result<PlanUpsertRequest, DomainError> {
        let plan_name: String = optional_text(&self.plan_name).ok_or(DomainError::MissingPlanName)?;
        let base_fee: f64 = parse_amount(&self.base_fee, DomainError::InvalidBaseFee)?;
        let per_minute_rate: f64 =
            parse_amount(&self.per_minute_rate, DomainError::InvalidPerMinuteRate)?;
        let ebike_surcharge: Option<f64> =
            parse_optional_amount(&self.ebike_surcharge, DomainError::InvalidEbikeSurcharge)?;
        let effective_from: Option<(PrimitiveDateTime, String)> =
            normalize_date_time(&self.effective_from, "Effective from")?;
        let effective_to: Option<(PrimitiveDateTime, String)> =
            normalize_date_time(&self.effective_to, "Effective to")?;

        if effective_from
            .as_ref()
            .zip(effective_to.as_ref())
            .is_some_and(|((from, _), (to, _))| to < from)
        {
            return Err(DomainError::EffectiveRangeInverted);
        }

        Ok(PlanUpsertRequest {
            plan_name,
            base_fee,
            per_minute_rate,
            ebike_surcharge,
            membership_tier: self.membership_tier,
            city_id: optional_text(&self.city_id),
            effective_from: effective_from.map(|(_, text)| text),
            effective_to: effective_to.map(|(_, text)| text),
            description: optional_text(&self.description),
            publish: self.publish,
        })
    }
}
