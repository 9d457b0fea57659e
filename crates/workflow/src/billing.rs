// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing, dispute and plan administration.
//!
//! Every section loads independently and reports its own error. Actions
//! validate locally, call the backend, and then refetch whatever the call
//! may have changed; fetched collections are never patched in place.

use crate::context::{WorkflowContext, fetch_if};
use crate::ledger::{LedgerPreview, preview_ledger};
use crate::section::{Notice, Outcome, Section};
use qwikride_api::{ApiError, ApiResponse, Download, DownloadSink, Transport};
use qwikride_domain::{
    BillingLedgerEntry, BillingPeriod, DisputeDraft, DisputeResolution, DisputeSubmission,
    DisputeTicket, DomainError, PaymentResult, PlanForm, PlanUpsertRequest, PricingPlan,
    ResolutionDraft, SessionUser, SettleRequest, TripSummary, balance_changed,
    compute_pending_balance, select_entry,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const PLANS_FAILED: &str = "Unable to load pricing plans at this time.";
const HISTORY_FAILED: &str = "Unable to load billing history.";
const DISPUTES_FAILED: &str = "Unable to load disputes at this time.";
const OPEN_DISPUTES_FAILED: &str = "Unable to load open disputes.";
const ADMIN_PLANS_FAILED: &str = "Unable to load plan catalogue.";
const SUMMARY_FAILED: &str = "Unable to load trip summary.";
const SETTLE_FAILED: &str = "Payment failed. Please try again or contact support.";
const RECEIPT_DOWNLOADED: &str = "Receipt downloaded.";
const RECEIPT_FAILED: &str = "Unable to download receipt right now.";
const EXPORT_DOWNLOADED: &str = "Ledger export downloaded.";
const EXPORT_FAILED: &str = "Unable to download ledger export.";
const DISPUTE_SUBMITTED: &str = "Dispute submitted. Our team will review it shortly.";
const DISPUTE_FAILED: &str = "Unable to submit dispute. Please try again later.";
const RESOLVE_FAILED: &str = "Unable to update dispute status.";
const PLAN_CREATED: &str = "Plan created.";
const PLAN_UPDATED: &str = "Plan updated.";
const PLAN_FAILED: &str = "Unable to save pricing plan.";

/// Identifies one trip summary fetch.
///
/// A result is applied only if no other entry was selected since the
/// ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryTicket {
    pub entry_id: i64,
    pub generation: u64,
}

/// State and actions of the billing screen.
#[derive(Debug)]
pub struct BillingWorkflow<T> {
    ctx: WorkflowContext<T>,
    plans: Section<Vec<PricingPlan>>,
    history: Section<Vec<BillingLedgerEntry>>,
    summary: Section<Option<TripSummary>>,
    disputes: Section<Vec<DisputeTicket>>,
    open_disputes: Section<Vec<DisputeTicket>>,
    admin_plans: Section<Vec<PricingPlan>>,
    period: BillingPeriod,
    selected_entry_id: Option<i64>,
    summary_generation: u64,
    pending_balance: Option<f64>,
    dispute_draft: DisputeDraft,
    resolution_drafts: HashMap<i64, ResolutionDraft>,
    plan_form: PlanForm,
    editing_plan_id: Option<String>,
    ledger_preview: Option<LedgerPreview>,
    billing_notice: Option<Notice>,
    dispute_notice: Option<Notice>,
    operator_notice: Option<Notice>,
    plan_notice: Option<Notice>,
}

impl<T: Transport> BillingWorkflow<T> {
    /// Creates an empty workflow. Nothing is fetched until [`Self::mount`].
    #[must_use]
    pub fn new(ctx: WorkflowContext<T>) -> Self {
        Self {
            ctx,
            plans: Section::default(),
            history: Section::default(),
            summary: Section::default(),
            disputes: Section::default(),
            open_disputes: Section::default(),
            admin_plans: Section::default(),
            period: BillingPeriod::default(),
            selected_entry_id: None,
            summary_generation: 0,
            pending_balance: None,
            dispute_draft: DisputeDraft::default(),
            resolution_drafts: HashMap::new(),
            plan_form: PlanForm::default(),
            editing_plan_id: None,
            ledger_preview: None,
            billing_notice: None,
            dispute_notice: None,
            operator_notice: None,
            plan_notice: None,
        }
    }

    /// Returns the workflow with `period` applied before the first fetch.
    #[must_use]
    pub fn with_period(mut self, period: BillingPeriod) -> Self {
        self.period = period;
        self
    }

    // Accessors

    #[must_use]
    pub const fn plans(&self) -> &Section<Vec<PricingPlan>> {
        &self.plans
    }

    #[must_use]
    pub const fn history(&self) -> &Section<Vec<BillingLedgerEntry>> {
        &self.history
    }

    #[must_use]
    pub const fn summary(&self) -> &Section<Option<TripSummary>> {
        &self.summary
    }

    #[must_use]
    pub const fn disputes(&self) -> &Section<Vec<DisputeTicket>> {
        &self.disputes
    }

    #[must_use]
    pub const fn open_disputes(&self) -> &Section<Vec<DisputeTicket>> {
        &self.open_disputes
    }

    #[must_use]
    pub const fn admin_plans(&self) -> &Section<Vec<PricingPlan>> {
        &self.admin_plans
    }

    /// Sum of pending charges from the last successful history fetch.
    #[must_use]
    pub const fn pending_balance(&self) -> Option<f64> {
        self.pending_balance
    }

    #[must_use]
    pub const fn selected_entry_id(&self) -> Option<i64> {
        self.selected_entry_id
    }

    /// Returns the selected ledger entry.
    #[must_use]
    pub fn active_entry(&self) -> Option<&BillingLedgerEntry> {
        let id: i64 = self.selected_entry_id?;
        self.history
            .data
            .iter()
            .find(|entry| entry.ledger_entry_id == id)
    }

    #[must_use]
    pub const fn billing_notice(&self) -> Option<&Notice> {
        self.billing_notice.as_ref()
    }

    #[must_use]
    pub const fn dispute_notice(&self) -> Option<&Notice> {
        self.dispute_notice.as_ref()
    }

    #[must_use]
    pub const fn operator_notice(&self) -> Option<&Notice> {
        self.operator_notice.as_ref()
    }

    #[must_use]
    pub const fn plan_notice(&self) -> Option<&Notice> {
        self.plan_notice.as_ref()
    }

    #[must_use]
    pub const fn ledger_preview(&self) -> Option<&LedgerPreview> {
        self.ledger_preview.as_ref()
    }

    #[must_use]
    pub const fn period(&self) -> &BillingPeriod {
        &self.period
    }

    /// Plan version being edited, or `None` when the form creates a plan.
    #[must_use]
    pub fn editing_plan_id(&self) -> Option<&str> {
        self.editing_plan_id.as_deref()
    }

    #[must_use]
    pub const fn plan_form(&self) -> &PlanForm {
        &self.plan_form
    }

    pub const fn plan_form_mut(&mut self) -> &mut PlanForm {
        &mut self.plan_form
    }

    #[must_use]
    pub const fn dispute_draft(&self) -> &DisputeDraft {
        &self.dispute_draft
    }

    pub const fn dispute_draft_mut(&mut self) -> &mut DisputeDraft {
        &mut self.dispute_draft
    }

    /// Returns the resolution draft for `ticket_id`, creating it if needed.
    pub fn resolution_draft_mut(&mut self, ticket_id: i64) -> &mut ResolutionDraft {
        self.resolution_drafts.entry(ticket_id).or_default()
    }

    #[must_use]
    pub fn resolution_draft(&self, ticket_id: i64) -> Option<&ResolutionDraft> {
        self.resolution_drafts.get(&ticket_id)
    }

    fn viewer(&self) -> Option<SessionUser> {
        self.ctx.current_user()
    }

    // Loading

    /// Loads every section the viewer may see, then the selected summary.
    ///
    /// Sections are fetched concurrently and applied as a batch.
    pub async fn mount(&mut self) {
        let viewer: Option<SessionUser> = self.viewer();
        let is_rider: bool = viewer.as_ref().is_some_and(|user| !user.is_operator());
        let is_operator: bool = viewer.as_ref().is_some_and(SessionUser::is_operator);
        let rider_id: Option<i64> = viewer.as_ref().map(|user| user.id);
        debug!(?rider_id, is_operator, "Mounting billing workflow");

        self.plans.begin();
        if viewer.is_some() {
            self.history.begin();
        }
        if is_rider {
            self.disputes.begin();
        }
        if is_operator {
            self.open_disputes.begin();
            self.admin_plans.begin();
        }

        let ctx: WorkflowContext<T> = self.ctx.clone();
        let period: BillingPeriod = self.period.clone();
        let api = ctx.api();
        let (plans, history, disputes, open_disputes, admin_plans) = futures::join!(
            api.get_pricing_plans(),
            fetch_if(
                rider_id.is_some(),
                api.get_billing_history(rider_id.unwrap_or_default(), &period)
            ),
            fetch_if(is_rider, api.list_disputes()),
            fetch_if(is_operator, api.list_open_disputes()),
            fetch_if(is_operator, api.list_plans()),
        );

        self.apply_plans(plans);
        match (viewer, history) {
            (Some(user), Some(result)) => {
                self.apply_history(&user, result);
            }
            _ => self.reset_history(),
        }
        match disputes {
            Some(result) => {
                self.apply_disputes(result);
            }
            None => self.disputes.reset(),
        }
        match open_disputes {
            Some(result) => {
                self.apply_open_disputes(result);
            }
            None => self.open_disputes.reset(),
        }
        match admin_plans {
            Some(result) => {
                self.apply_admin_plans(result);
            }
            None => self.admin_plans.reset(),
        }

        self.load_summary().await;
    }

    /// Fetches the public plan list. Needs no session.
    pub async fn fetch_plans(&mut self) -> Outcome {
        self.plans.begin();
        let result = self.ctx.api().get_pricing_plans().await;
        self.apply_plans(result)
    }

    fn apply_plans(&mut self, result: Result<ApiResponse<Vec<PricingPlan>>, ApiError>) -> Outcome {
        match result {
            Ok(response) => {
                self.plans.succeed(response.data);
                Outcome::Completed
            }
            Err(ApiError::NotFound) => {
                self.plans.succeed(Vec::new());
                Outcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "Failed to load pricing plans");
                let message: String = self.ctx.describe_failure(&e, PLANS_FAILED);
                self.plans.fail(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    fn reset_history(&mut self) {
        self.history.reset();
        self.pending_balance = None;
        self.change_selection(None);
    }

    /// Fetches the viewer's ledger for the current period.
    ///
    /// Without a signed-in user the history, selection, summary and
    /// balance are cleared and no call is made.
    pub async fn fetch_billing_history(&mut self) -> Outcome {
        let Some(user) = self.viewer() else {
            self.reset_history();
            return Outcome::Skipped;
        };
        self.history.begin();
        let result = self
            .ctx
            .api()
            .get_billing_history(user.id, &self.period)
            .await;
        self.apply_history(&user, result)
    }

    fn apply_history(
        &mut self,
        user: &SessionUser,
        result: Result<ApiResponse<Vec<BillingLedgerEntry>>, ApiError>,
    ) -> Outcome {
        let entries: Vec<BillingLedgerEntry> = match result {
            Ok(response) => response.data,
            Err(ApiError::NotFound) => Vec::new(),
            Err(e) => {
                warn!(rider_id = user.id, error = %e, "Failed to load billing history");
                let message: String = self.ctx.describe_failure(&e, HISTORY_FAILED);
                self.history.fail(message.clone());
                self.pending_balance = None;
                self.change_selection(None);
                return Outcome::Failed(message);
            }
        };

        let balance: f64 = compute_pending_balance(&entries);
        self.pending_balance = Some(balance);
        self.publish_balance(user.id, balance);

        let selection: Option<i64> = select_entry(&entries, self.selected_entry_id);
        self.history.succeed(entries);
        if selection != self.selected_entry_id {
            self.change_selection(selection);
        }
        Outcome::Completed
    }

    /// Copies the balance into the session when it moved by at least a cent's half.
    fn publish_balance(&self, user_id: i64, balance: f64) {
        let result = self.ctx.session().update_user(|current| {
            if current.id == user_id && balance_changed(current.pending_balance, balance) {
                current.with_pending_balance(balance)
            } else {
                current.clone()
            }
        });
        match result {
            Ok(true) => debug!(user_id, balance, "Published pending balance"),
            Ok(false) => {}
            Err(e) => warn!(user_id, error = %e, "Failed to store pending balance"),
        }
    }

    /// Replaces the period and refetches the history.
    pub async fn set_period(&mut self, period: BillingPeriod) -> Outcome {
        self.period = period;
        self.fetch_billing_history().await
    }

    /// Fetches the rider's own disputes. Operators get an empty list.
    pub async fn fetch_disputes(&mut self) -> Outcome {
        if !self.viewer().is_some_and(|user| !user.is_operator()) {
            self.disputes.reset();
            return Outcome::Skipped;
        }
        self.disputes.begin();
        let result = self.ctx.api().list_disputes().await;
        self.apply_disputes(result)
    }

    fn apply_disputes(&mut self, result: Result<ApiResponse<Vec<DisputeTicket>>, ApiError>) -> Outcome {
        apply_list(&self.ctx, &mut self.disputes, result, DISPUTES_FAILED)
    }

    /// Fetches every open dispute. Operators only.
    pub async fn fetch_open_disputes(&mut self) -> Outcome {
        if !self.viewer().is_some_and(|user| user.is_operator()) {
            self.open_disputes.reset();
            return Outcome::Skipped;
        }
        self.open_disputes.begin();
        let result = self.ctx.api().list_open_disputes().await;
        self.apply_open_disputes(result)
    }

    fn apply_open_disputes(
        &mut self,
        result: Result<ApiResponse<Vec<DisputeTicket>>, ApiError>,
    ) -> Outcome {
        apply_list(&self.ctx, &mut self.open_disputes, result, OPEN_DISPUTES_FAILED)
    }

    /// Fetches the full plan catalogue. Operators only.
    pub async fn fetch_admin_plans(&mut self) -> Outcome {
        if !self.viewer().is_some_and(|user| user.is_operator()) {
            self.admin_plans.reset();
            return Outcome::Skipped;
        }
        self.admin_plans.begin();
        let result = self.ctx.api().list_plans().await;
        self.apply_admin_plans(result)
    }

    fn apply_admin_plans(&mut self, result: Result<ApiResponse<Vec<PricingPlan>>, ApiError>) -> Outcome {
        apply_list(&self.ctx, &mut self.admin_plans, result, ADMIN_PLANS_FAILED)
    }

    // Selection and trip summary

    fn change_selection(&mut self, selection: Option<i64>) {
        self.selected_entry_id = selection;
        self.summary_generation += 1;
        self.summary.reset();
        self.billing_notice = None;
        self.dispute_notice = None;
        self.dispute_draft = DisputeDraft::default();
    }

    /// Selects a ledger entry from the loaded history.
    ///
    /// Returns `false` if no loaded entry has that id. Selecting clears
    /// entry-scoped feedback and the dispute draft, and invalidates any
    /// summary fetch still in flight.
    pub fn select_entry(&mut self, ledger_entry_id: i64) -> bool {
        if !self
            .history
            .data
            .iter()
            .any(|entry| entry.ledger_entry_id == ledger_entry_id)
        {
            return false;
        }
        if self.selected_entry_id != Some(ledger_entry_id) {
            self.change_selection(Some(ledger_entry_id));
        }
        true
    }

    /// Starts a summary fetch for the current selection.
    pub fn begin_summary_fetch(&mut self) -> Option<SummaryTicket> {
        let entry_id: i64 = self.selected_entry_id?;
        self.summary.begin();
        Some(SummaryTicket {
            entry_id,
            generation: self.summary_generation,
        })
    }

    /// Applies a summary result if `ticket` is still current.
    ///
    /// Returns whether the result was applied.
    pub fn apply_summary(
        &mut self,
        ticket: SummaryTicket,
        result: Result<ApiResponse<TripSummary>, ApiError>,
    ) -> bool {
        if ticket.generation != self.summary_generation
            || self.selected_entry_id != Some(ticket.entry_id)
        {
            debug!(
                ledger_entry_id = ticket.entry_id,
                "Dropping trip summary for a previous selection"
            );
            return false;
        }
        match result {
            Ok(response) => self.summary.succeed(Some(response.data)),
            Err(e) => {
                warn!(ledger_entry_id = ticket.entry_id, error = %e, "Failed to load trip summary");
                let message: String = self.ctx.describe_failure(&e, SUMMARY_FAILED);
                self.summary.fail(message);
            }
        }
        true
    }

    /// Fetches and applies the summary for the current selection.
    pub async fn load_summary(&mut self) {
        let Some(ticket) = self.begin_summary_fetch() else {
            self.summary.reset();
            return;
        };
        let result = self.ctx.api().get_trip_summary(ticket.entry_id).await;
        self.apply_summary(ticket, result);
    }

    // Billing actions

    /// Pays the selected entry with the saved payment method.
    ///
    /// Does nothing unless the entry is pending. A declined payment is
    /// reported as `Failed` with the processor's reason. Whenever the
    /// backend answered, the history is refetched.
    pub async fn settle_payment(&mut self) -> Outcome {
        let Some(entry_id) = self
            .active_entry()
            .filter(|entry| entry.can_settle())
            .map(|entry| entry.ledger_entry_id)
        else {
            return Outcome::Skipped;
        };
        self.billing_notice = None;

        let result = self
            .ctx
            .api()
            .settle_payment(entry_id, &SettleRequest::default())
            .await;
        let outcome: Outcome = match result {
            Ok(response) => {
                let payment: PaymentResult = response.data;
                let message: String = payment.user_message();
                if payment.success {
                    info!(
                        ledger_entry_id = entry_id,
                        transaction_id = payment.transaction_id.as_deref().unwrap_or_default(),
                        "Payment settled"
                    );
                    self.billing_notice = Some(Notice::Success(message));
                    Outcome::Completed
                } else {
                    warn!(ledger_entry_id = entry_id, reason = ?payment.failure_reason, "Payment declined");
                    self.billing_notice = Some(Notice::Error(message.clone()));
                    Outcome::Failed(message)
                }
            }
            Err(e) => {
                warn!(ledger_entry_id = entry_id, error = %e, "Failed to settle payment");
                let message: String = self.ctx.describe_failure(&e, SETTLE_FAILED);
                self.billing_notice = Some(Notice::Error(message.clone()));
                return Outcome::Failed(message);
            }
        };

        self.fetch_billing_history().await;
        self.load_summary().await;
        outcome
    }

    /// Downloads the receipt of the selected entry into `sink`.
    ///
    /// Does nothing unless the entry is paid or adjusted.
    pub async fn download_receipt(&mut self, sink: &dyn DownloadSink) -> Outcome {
        let Some(entry_id) = self
            .active_entry()
            .filter(|entry| entry.can_download_receipt())
            .map(|entry| entry.ledger_entry_id)
        else {
            return Outcome::Skipped;
        };
        self.billing_notice = None;

        let result = self.ctx.api().download_receipt(entry_id).await;
        match self.deliver(result, sink, RECEIPT_FAILED) {
            Ok(_) => {
                self.billing_notice = Some(Notice::Success(String::from(RECEIPT_DOWNLOADED)));
                Outcome::Completed
            }
            Err(message) => {
                self.billing_notice = Some(Notice::Error(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Downloads the ledger export for the current period. Operators only.
    pub async fn export_ledger(&mut self, sink: &dyn DownloadSink) -> Outcome {
        if !self.viewer().is_some_and(|user| user.is_operator()) {
            return Outcome::Rejected(
                DomainError::OperatorOnly {
                    action: "export the ledger",
                }
                .to_string(),
            );
        }
        self.operator_notice = None;

        let result = self.ctx.api().export_ledger(&self.period).await;
        match self.deliver(result, sink, EXPORT_FAILED) {
            Ok(download) => {
                self.ledger_preview = match preview_ledger(&download.bytes) {
                    Ok(preview) => Some(preview),
                    Err(e) => {
                        warn!(error = %e, "Ledger export is not readable CSV");
                        None
                    }
                };
                self.operator_notice = Some(Notice::Success(String::from(EXPORT_DOWNLOADED)));
                Outcome::Completed
            }
            Err(message) => {
                self.operator_notice = Some(Notice::Error(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    fn deliver(
        &self,
        result: Result<ApiResponse<Download>, ApiError>,
        sink: &dyn DownloadSink,
        fallback: &str,
    ) -> Result<Download, String> {
        let download: Download = match result {
            Ok(response) => response.data,
            Err(e) => {
                warn!(error = %e, "Download failed");
                return Err(self.ctx.describe_failure(&e, fallback));
            }
        };
        match sink.deliver(&download) {
            Ok(path) => {
                info!(file = %path.display(), "Download delivered");
                Ok(download)
            }
            Err(e) => {
                warn!(filename = %download.filename, error = %e, "Failed to save download");
                Err(fallback.to_string())
            }
        }
    }

    // Disputes

    /// Submits the dispute draft against the selected entry. Riders only.
    pub async fn submit_dispute(&mut self) -> Outcome {
        if !self.viewer().is_some_and(|user| !user.is_operator()) {
            return Outcome::Rejected(
                DomainError::RiderOnly {
                    action: "submit disputes",
                }
                .to_string(),
            );
        }
        let Some(entry_id) = self.selected_entry_id else {
            return Outcome::Rejected(DomainError::NoActiveEntry.to_string());
        };
        let submission: DisputeSubmission = match self.dispute_draft.to_submission(entry_id) {
            Ok(submission) => submission,
            Err(e) => {
                let message: String = e.to_string();
                self.dispute_notice = Some(Notice::Error(message.clone()));
                return Outcome::Rejected(message);
            }
        };
        self.dispute_notice = None;

        match self.ctx.api().submit_dispute(&submission).await {
            Ok(response) => {
                info!(
                    ledger_entry_id = entry_id,
                    ticket_id = response.data.id,
                    "Dispute submitted"
                );
                self.dispute_notice = Some(Notice::Success(String::from(DISPUTE_SUBMITTED)));
                self.dispute_draft = DisputeDraft::default();
                self.fetch_disputes().await;
                Outcome::Completed
            }
            Err(e) => {
                warn!(ledger_entry_id = entry_id, error = %e, "Failed to submit dispute");
                let message: String = self.ctx.describe_failure(&e, DISPUTE_FAILED);
                self.dispute_notice = Some(Notice::Error(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Approves or rejects a dispute using its resolution draft. Operators only.
    ///
    /// Approval needs a positive adjustment amount. On success the open
    /// disputes, the billing history and the rider dispute list are
    /// refetched in that order.
    pub async fn resolve_dispute(&mut self, ticket_id: i64, approved: bool) -> Outcome {
        if !self.viewer().is_some_and(|user| user.is_operator()) {
            return Outcome::Rejected(
                DomainError::OperatorOnly {
                    action: "resolve disputes",
                }
                .to_string(),
            );
        }
        let draft: ResolutionDraft = self
            .resolution_drafts
            .get(&ticket_id)
            .cloned()
            .unwrap_or_default();
        let resolution: DisputeResolution = match draft.to_resolution(approved) {
            Ok(resolution) => resolution,
            Err(e) => {
                let message: String = e.to_string();
                self.operator_notice = Some(Notice::Error(message.clone()));
                return Outcome::Rejected(message);
            }
        };
        self.operator_notice = None;

        if let Err(e) = self.ctx.api().resolve_dispute(ticket_id, &resolution).await {
            warn!(ticket_id, error = %e, "Failed to resolve dispute");
            let message: String = self.ctx.describe_failure(&e, RESOLVE_FAILED);
            self.operator_notice = Some(Notice::Error(message.clone()));
            return Outcome::Failed(message);
        }

        let verdict: &str = if approved { "approved" } else { "rejected" };
        info!(ticket_id, verdict, "Dispute resolved");
        self.operator_notice = Some(Notice::Success(format!("Dispute #{ticket_id} {verdict}.")));
        self.resolution_drafts.remove(&ticket_id);

        self.fetch_open_disputes().await;
        self.fetch_billing_history().await;
        self.fetch_disputes().await;
        Outcome::Completed
    }

    // Plan administration

    /// Loads `plan` into the form and switches to edit mode.
    pub fn edit_plan(&mut self, plan: &PricingPlan) {
        self.plan_notice = None;
        self.plan_form = PlanForm::from_plan(plan);
        self.editing_plan_id = Some(plan.plan_version_id.clone());
    }

    /// Leaves edit mode and clears the form.
    pub fn cancel_plan_edit(&mut self) {
        self.plan_notice = None;
        self.plan_form = PlanForm::default();
        self.editing_plan_id = None;
    }

    /// Validates the plan form and creates or updates the plan. Operators only.
    ///
    /// On success the form is cleared, edit mode ends, and both plan lists
    /// are refetched concurrently.
    pub async fn submit_plan_form(&mut self) -> Outcome {
        if !self.viewer().is_some_and(|user| user.is_operator()) {
            return Outcome::Rejected(
                DomainError::OperatorOnly {
                    action: "manage pricing plans",
                }
                .to_string(),
            );
        }
        self.plan_notice = None;
        let request: PlanUpsertRequest = match self.plan_form.to_request() {
            Ok(request) => request,
            Err(e) => {
                let message: String = e.to_string();
                self.plan_notice = Some(Notice::Error(message.clone()));
                return Outcome::Rejected(message);
            }
        };

        let (result, success_message) = match self.editing_plan_id.as_deref() {
            Some(plan_version_id) => (
                self.ctx.api().update_plan(plan_version_id, &request).await,
                PLAN_UPDATED,
            ),
            None => (self.ctx.api().create_plan(&request).await, PLAN_CREATED),
        };
        match result {
            Ok(response) => {
                info!(
                    plan_version_id = %response.data.plan_version_id,
                    plan_name = %response.data.plan_name,
                    "Pricing plan saved"
                );
                self.plan_notice = Some(Notice::Success(String::from(success_message)));
                self.plan_form = PlanForm::default();
                self.editing_plan_id = None;
                self.refresh_plan_lists().await;
                Outcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "Failed to save pricing plan");
                let message: String = self.ctx.describe_failure(&e, PLAN_FAILED);
                self.plan_notice = Some(Notice::Error(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    async fn refresh_plan_lists(&mut self) {
        self.admin_plans.begin();
        self.plans.begin();
        let ctx: WorkflowContext<T> = self.ctx.clone();
        let (admin, public) =
            futures::join!(ctx.api().list_plans(), ctx.api().get_pricing_plans());
        self.apply_admin_plans(admin);
        self.apply_plans(public);
    }
}

/// Applies a list fetch where 404 means "nothing yet".
fn apply_list<T: Transport, D>(
    ctx: &WorkflowContext<T>,
    section: &mut Section<Vec<D>>,
    result: Result<ApiResponse<Vec<D>>, ApiError>,
    fallback: &str,
) -> Outcome {
    match result {
        Ok(response) => {
            section.succeed(response.data);
            Outcome::Completed
        }
        Err(ApiError::NotFound) => {
            section.succeed(Vec::new());
            Outcome::Completed
        }
        Err(e) => {
            warn!(error = %e, "{fallback}");
            let message: String = ctx.describe_failure(&e, fallback);
            section.fail(message.clone());
            Outcome::Failed(message)
        }
    }
}
