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
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Screen-level controllers for the QwikRide client.
//!
//! Each workflow owns the state of one screen, reads the signed-in user
//! from the shared [`qwikride::SessionStore`], and talks to the backend
//! only through [`qwikride_api::ApiClient`].

mod auth;
mod billing;
mod context;
mod fleet;
mod history;
mod ledger;
mod section;

#[cfg(test)]
mod tests;

pub use auth::AuthWorkflow;
pub use billing::{BillingWorkflow, SummaryTicket};
pub use context::{ACCESS_DENIED_MESSAGE, SESSION_EXPIRED_MESSAGE, WorkflowContext};
pub use fleet::FleetView;
pub use history::RideHistoryView;
pub use ledger::{LedgerPreview, preview_ledger};
pub use section::{Notice, Outcome, Section};
