// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Runs one subcommand against the workflows and prints the result.

use crate::args::{Command, HistoryArgs, PeriodArgs, PlanArgs, RegisterArgs};
use crate::error::CliError;
use crate::render;
use qwikride_api::{DirectorySink, Transport};
use qwikride_domain::{
    BillingPeriod, DisputeTicket, DomainError, PlanForm, PricingPlan, RegisterRequest,
    RideHistoryFilter, SessionUser,
};
use qwikride_workflow::{
    AuthWorkflow, BillingWorkflow, FleetView, Notice, Outcome, RideHistoryView, Section,
    WorkflowContext,
};
use std::io::Write;
use tracing::debug;

const RIDE_FAILED: &str = "Failed to load ride. Please try again.";

/// One invocation of the client.
pub struct App<T, W> {
    ctx: WorkflowContext<T>,
    downloads: DirectorySink,
    out: W,
}

impl<T: Transport, W: Write + Send + Sync> App<T, W> {
    pub const fn new(ctx: WorkflowContext<T>, downloads: DirectorySink, out: W) -> Self {
        Self {
            ctx,
            downloads,
            out,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes `command`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Action`] when the action was refused or failed,
    /// and other variants when output could not be written.
    pub async fn run(&mut self, command: Command) -> Result<(), CliError> {
        match command {
            Command::Login { username, password } => self.login(&username, &password).await,
            Command::Logout => self.logout(),
            Command::Register(args) => self.register(args).await,
            Command::Whoami => self.whoami(),
            Command::Plans => self.plans().await,
            Command::Billing { period, entry } => self.billing(&period, entry).await,
            Command::Settle { entry } => self.settle(entry).await,
            Command::Receipt { entry } => self.receipt(entry).await,
            Command::ExportLedger { period } => self.export_ledger(&period).await,
            Command::Disputes => self.disputes().await,
            Command::Dispute {
                entry,
                reason,
                evidence_url,
            } => self.dispute(entry, reason, evidence_url).await,
            Command::OpenDisputes => self.open_disputes().await,
            Command::Resolve {
                ticket,
                approve,
                reject: _,
                note,
            } => self.resolve(ticket, approve, note).await,
            Command::PlanCreate(plan) => self.plan_create(&plan).await,
            Command::PlanUpdate {
                plan_version_id,
                plan,
            } => self.plan_update(&plan_version_id, &plan).await,
            Command::Stations => self.stations().await,
            Command::Reserve { station } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.reserve(station).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::Checkout { bike } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.checkout(&bike).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::Return {
                bike,
                station,
                duration,
                distance,
            } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.return_bike(&bike, station, duration, distance).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::Move { bike, from, to } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.move_bike(&bike, from, to).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::ToggleStation { station } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.toggle_station_status(station).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::CreateBike { station, bike_type } => {
                let mut fleet: FleetView<T> = self.fleet().await?;
                let outcome: Outcome = fleet.create_bike(bike_type, station).await;
                self.fleet_result(&fleet, outcome)
            }
            Command::Maintenance { bike } => {
                let mut fleet: FleetView<T> = FleetView::new(self.ctx.clone());
                let outcome: Outcome = fleet.mark_for_maintenance(&bike);
                self.fleet_result(&fleet, outcome)
            }
            Command::History(args) => self.history(&args).await,
        }
    }

    fn line(&mut self, text: impl std::fmt::Display) -> Result<(), CliError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn notice(&mut self, notice: Option<&Notice>, fallback: &str) -> Result<(), CliError> {
        let text: String = notice.map_or_else(|| fallback.to_string(), ToString::to_string);
        self.line(text)
    }

    // Account

    async fn login(&mut self, username: &str, password: &str) -> Result<(), CliError> {
        let mut auth: AuthWorkflow<T> = AuthWorkflow::new(self.ctx.clone());
        completed(auth.login(username, password).await)?;
        match self.ctx.current_user() {
            Some(user) => self.line(format!("Signed in as {}", render::user(&user))),
            None => Err(CliError::action(DomainError::NotSignedIn.to_string())),
        }
    }

    fn logout(&mut self) -> Result<(), CliError> {
        let mut auth: AuthWorkflow<T> = AuthWorkflow::new(self.ctx.clone());
        completed(auth.logout())?;
        self.line("Signed out")
    }

    async fn register(&mut self, args: RegisterArgs) -> Result<(), CliError> {
        let request: RegisterRequest = RegisterRequest {
            full_name: args.full_name,
            address: args.address,
            email: args.email,
            username: args.username,
            password: args.password,
            payment_info: args.payment_info,
        };
        let mut auth: AuthWorkflow<T> = AuthWorkflow::new(self.ctx.clone());
        completed(auth.register(&request).await)?;
        let notice: Option<Notice> = auth.notice().cloned();
        self.notice(notice.as_ref(), "Account created")
    }

    fn whoami(&mut self) -> Result<(), CliError> {
        let user: SessionUser = self
            .ctx
            .current_user()
            .ok_or_else(|| CliError::action(DomainError::NotSignedIn.to_string()))?;
        self.line(render::user(&user))
    }

    // Billing

    async fn plans(&mut self) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        completed(billing.fetch_plans().await)?;
        self.plan_list(&billing.plans().data)
    }

    fn plan_list(&mut self, plans: &[PricingPlan]) -> Result<(), CliError> {
        if plans.is_empty() {
            return self.line("No pricing plans published.");
        }
        for plan in plans {
            self.line(render::plan(plan))?;
        }
        Ok(())
    }

    /// Mounts billing for `period` and selects `entry` if given.
    async fn mount_billing(
        &self,
        period: &PeriodArgs,
        entry: Option<i64>,
    ) -> Result<BillingWorkflow<T>, CliError> {
        let period: BillingPeriod =
            BillingPeriod::new(period.start.as_deref(), period.end.as_deref())
                .map_err(|e| CliError::action(e.to_string()))?;
        debug!(?period, ?entry, "Opening billing");
        let mut billing: BillingWorkflow<T> =
            BillingWorkflow::new(self.ctx.clone()).with_period(period);
        billing.mount().await;
        section_ok(billing.history())?;

        if let Some(entry_id) = entry {
            if !billing.select_entry(entry_id) {
                return Err(CliError::action(format!(
                    "Ledger entry #{entry_id} is not in your billing history"
                )));
            }
            billing.load_summary().await;
        }
        Ok(billing)
    }

    async fn billing(&mut self, period: &PeriodArgs, entry: Option<i64>) -> Result<(), CliError> {
        let billing: BillingWorkflow<T> = self.mount_billing(period, entry).await?;

        if let Some(balance) = billing.pending_balance() {
            self.line(format!("Pending balance: {}", render::money(balance)))?;
        }
        let entries = &billing.history().data;
        if entries.is_empty() {
            self.line("No billing activity for this period.")?;
        }
        for entry in entries {
            let selected: bool = billing.selected_entry_id() == Some(entry.ledger_entry_id);
            self.line(render::ledger_entry(entry, selected))?;
        }

        let summary = billing.summary();
        if let Some(error) = &summary.error {
            self.line(error)?;
        } else if let Some(trip) = &summary.data {
            for line in render::summary(trip) {
                self.line(line)?;
            }
        }
        Ok(())
    }

    async fn settle(&mut self, entry: i64) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> =
            self.mount_billing(&PeriodArgs::default(), Some(entry)).await?;
        match billing.settle_payment().await {
            Outcome::Skipped => Err(CliError::action(format!(
                "Ledger entry #{entry} has nothing to pay"
            ))),
            outcome => {
                completed(outcome)?;
                let notice: Option<Notice> = billing.billing_notice().cloned();
                self.notice(notice.as_ref(), "Payment completed")
            }
        }
    }

    async fn receipt(&mut self, entry: i64) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> =
            self.mount_billing(&PeriodArgs::default(), Some(entry)).await?;
        match billing.download_receipt(&self.downloads).await {
            Outcome::Skipped => Err(CliError::action(format!(
                "Ledger entry #{entry} has no receipt yet"
            ))),
            outcome => {
                completed(outcome)?;
                let notice: Option<Notice> = billing.billing_notice().cloned();
                self.notice(notice.as_ref(), "Receipt downloaded.")?;
                self.line(format!("Saved to {}", self.downloads.directory().display()))
            }
        }
    }

    async fn export_ledger(&mut self, period: &PeriodArgs) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = self.mount_billing(period, None).await?;
        completed(billing.export_ledger(&self.downloads).await)?;
        let notice: Option<Notice> = billing.operator_notice().cloned();
        self.notice(notice.as_ref(), "Ledger export downloaded.")?;
        if let Some(preview) = billing.ledger_preview() {
            let text: String = render::ledger_preview(preview);
            self.line(text)?;
        }
        Ok(())
    }

    // Disputes

    async fn disputes(&mut self) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        match billing.fetch_disputes().await {
            Outcome::Skipped => Err(CliError::action("Operators have no disputes of their own")),
            outcome => {
                completed(outcome)?;
                self.dispute_list(&billing.disputes().data, "You have not filed any disputes.")
            }
        }
    }

    fn dispute_list(
        &mut self,
        tickets: &[DisputeTicket],
        empty: &str,
    ) -> Result<(), CliError> {
        if tickets.is_empty() {
            return self.line(empty);
        }
        for ticket in tickets {
            self.line(render::dispute(ticket))?;
        }
        Ok(())
    }

    async fn dispute(
        &mut self,
        entry: i64,
        reason: String,
        evidence_url: Option<String>,
    ) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> =
            self.mount_billing(&PeriodArgs::default(), Some(entry)).await?;
        let draft = billing.dispute_draft_mut();
        draft.reason = reason;
        draft.evidence_url = evidence_url.unwrap_or_default();
        completed(billing.submit_dispute().await)?;
        let notice: Option<Notice> = billing.dispute_notice().cloned();
        self.notice(notice.as_ref(), "Dispute submitted.")
    }

    async fn open_disputes(&mut self) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        match billing.fetch_open_disputes().await {
            Outcome::Skipped => Err(CliError::action(
                DomainError::OperatorOnly {
                    action: "review disputes",
                }
                .to_string(),
            )),
            outcome => {
                completed(outcome)?;
                self.dispute_list(&billing.open_disputes().data, "No open disputes.")
            }
        }
    }

    async fn resolve(
        &mut self,
        ticket: i64,
        approve: Option<String>,
        note: Option<String>,
    ) -> Result<(), CliError> {
        let approved: bool = approve.is_some();
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        let draft = billing.resolution_draft_mut(ticket);
        draft.amount = approve.unwrap_or_default();
        draft.note = note.unwrap_or_default();
        completed(billing.resolve_dispute(ticket, approved).await)?;
        let notice: Option<Notice> = billing.operator_notice().cloned();
        self.notice(notice.as_ref(), "Dispute resolved.")
    }

    // Plans

    async fn plan_create(&mut self, plan: &PlanArgs) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        apply_plan_args(plan, billing.plan_form_mut());
        completed(billing.submit_plan_form().await)?;
        let notice: Option<Notice> = billing.plan_notice().cloned();
        self.notice(notice.as_ref(), "Plan created.")
    }

    async fn plan_update(&mut self, plan_version_id: &str, plan: &PlanArgs) -> Result<(), CliError> {
        let mut billing: BillingWorkflow<T> = BillingWorkflow::new(self.ctx.clone());
        match billing.fetch_admin_plans().await {
            Outcome::Skipped => {
                return Err(CliError::action(
                    DomainError::OperatorOnly {
                        action: "manage pricing plans",
                    }
                    .to_string(),
                ));
            }
            outcome => completed(outcome)?,
        }
        let current: PricingPlan = billing
            .admin_plans()
            .data
            .iter()
            .find(|candidate| candidate.plan_version_id == plan_version_id)
            .cloned()
            .ok_or_else(|| CliError::action(format!("Plan {plan_version_id} not found")))?;
        billing.edit_plan(&current);
        apply_plan_args(plan, billing.plan_form_mut());
        completed(billing.submit_plan_form().await)?;
        let notice: Option<Notice> = billing.plan_notice().cloned();
        self.notice(notice.as_ref(), "Plan updated.")
    }

    // Fleet

    /// Loads stations and bikes for an action to validate against.
    async fn fleet(&self) -> Result<FleetView<T>, CliError> {
        let mut fleet: FleetView<T> = FleetView::new(self.ctx.clone());
        completed(fleet.load().await)?;
        Ok(fleet)
    }

    fn fleet_result(&mut self, fleet: &FleetView<T>, outcome: Outcome) -> Result<(), CliError> {
        completed(outcome)?;
        if let Some(entry) = fleet.console().latest() {
            self.line(entry.message.clone())?;
        }
        Ok(())
    }

    async fn stations(&mut self) -> Result<(), CliError> {
        let fleet: FleetView<T> = self.fleet().await?;
        for station in fleet.stations() {
            let line: String = render::station(station, &fleet.inventory(station.id));
            self.line(line)?;
        }
        let unassigned: Vec<String> = fleet
            .bikes()
            .iter()
            .filter(|bike| bike.station_id.is_none())
            .map(render::bike)
            .collect();
        if !unassigned.is_empty() {
            self.line("Bikes not docked:")?;
            for bike in unassigned {
                self.line(format!("  {bike}"))?;
            }
        }
        Ok(())
    }

    // Ride history

    async fn history(&mut self, args: &HistoryArgs) -> Result<(), CliError> {
        let mut view: RideHistoryView<T> = RideHistoryView::new(self.ctx.clone());
        if let Some(ride_id) = args.ride {
            let ride = view
                .ride(ride_id)
                .await
                .map_err(|e| CliError::action(e.message_or(RIDE_FAILED)))?;
            return self.line(render::ride(&ride));
        }

        let filter: RideHistoryFilter = RideHistoryFilter {
            start_date: args.start_date.clone(),
            end_date: args.end_date.clone(),
            status: args.status,
            bike_type: args.bike_type.clone(),
            page: args.page,
            size: args.size,
            ..RideHistoryFilter::default()
        };
        completed(view.apply_filters(filter).await)?;
        view.fetch_statistics().await;

        if let Some(stats) = view.statistics() {
            self.line(render::statistics(stats))?;
        }
        let records = &view.records().data;
        if records.is_empty() {
            return self.line("No rides found.");
        }
        for ride in records {
            self.line(render::ride(ride))?;
        }
        Ok(())
    }
}

/// Overlays the given plan fields onto `form`.
pub fn apply_plan_args(args: &PlanArgs, form: &mut PlanForm) {
    let fields: [(&Option<String>, &mut String); 8] = [
        (&args.name, &mut form.plan_name),
        (&args.base_fee, &mut form.base_fee),
        (&args.per_minute_rate, &mut form.per_minute_rate),
        (&args.ebike_surcharge, &mut form.ebike_surcharge),
        (&args.city, &mut form.city_id),
        (&args.effective_from, &mut form.effective_from),
        (&args.effective_to, &mut form.effective_to),
        (&args.description, &mut form.description),
    ];
    for (value, field) in fields {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    if let Some(tier) = args.tier {
        form.membership_tier = tier;
    }
    form.publish = !args.draft;
}

fn completed(outcome: Outcome) -> Result<(), CliError> {
    match outcome {
        Outcome::Completed | Outcome::Skipped => Ok(()),
        Outcome::Rejected(message) | Outcome::Failed(message) => Err(CliError::Action(message)),
    }
}

fn section_ok<D>(section: &Section<D>) -> Result<(), CliError> {
    section
        .error
        .as_ref()
        .map_or(Ok(()), |message| Err(CliError::action(message.clone())))
}
