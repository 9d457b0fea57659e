// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use qwikride_domain::{BikeType, MembershipTier, RideStatus};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// QwikRide - command-line client for the bikeshare backend
#[derive(Debug, Parser)]
#[command(name = "qwikride", author, version, about, long_about = None)]
pub struct Args {
    /// Backend base URL
    #[arg(long, env = "API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds; no timeout when omitted
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Directory holding the stored session
    #[arg(long, env = "QWIKRIDE_STATE_DIR", default_value = ".qwikride", global = true)]
    pub state_dir: PathBuf,

    /// Directory receipts and ledger exports are saved to
    #[arg(long, env = "QWIKRIDE_DOWNLOAD_DIR", default_value = ".", global = true)]
    pub download_dir: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "QWIKRIDE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Create a rider account
    Register(RegisterArgs),

    /// Show the signed-in user
    Whoami,

    /// List published pricing plans
    Plans,

    /// Show billing history, pending balance and a trip summary
    Billing {
        #[command(flatten)]
        period: PeriodArgs,
        /// Ledger entry to summarize; defaults to the first entry
        #[arg(long)]
        entry: Option<i64>,
    },

    /// Pay a pending ledger entry with the saved payment method
    Settle {
        #[arg(long)]
        entry: i64,
    },

    /// Download the receipt of a paid ledger entry
    Receipt {
        #[arg(long)]
        entry: i64,
    },

    /// Download the ledger export (operators)
    ExportLedger {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// List your disputes
    Disputes,

    /// Dispute a ledger entry
    Dispute {
        #[arg(long)]
        entry: i64,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        evidence_url: Option<String>,
    },

    /// List open disputes (operators)
    OpenDisputes,

    /// Approve or reject a dispute (operators)
    Resolve {
        #[arg(long)]
        ticket: i64,
        /// Approve with this adjustment amount
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: Option<String>,
        #[arg(long)]
        reject: bool,
        #[arg(long)]
        note: Option<String>,
    },

    /// Create a pricing plan (operators)
    PlanCreate(PlanArgs),

    /// Update a pricing plan (operators)
    PlanUpdate {
        /// Plan version to edit
        #[arg(long)]
        plan_version_id: String,
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Show stations with their occupancy and bike counts
    Stations,

    /// Reserve a bike at a station
    Reserve {
        #[arg(long)]
        station: i64,
    },

    /// Unlock an available or reserved bike
    Checkout {
        #[arg(long)]
        bike: String,
    },

    /// Return a bike to a station
    Return {
        #[arg(long)]
        bike: String,
        #[arg(long)]
        station: i64,
        /// Ride duration in minutes
        #[arg(long)]
        duration: f64,
        /// Ride distance in kilometres
        #[arg(long)]
        distance: f64,
    },

    /// Move a bike between stations (operators)
    Move {
        #[arg(long)]
        bike: String,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
    },

    /// Toggle a station in or out of service (operators)
    ToggleStation {
        #[arg(long)]
        station: i64,
    },

    /// Add a bike to a station (operators)
    CreateBike {
        #[arg(long)]
        station: i64,
        /// STANDARD or E_BIKE
        #[arg(long = "type", default_value = "STANDARD")]
        bike_type: BikeType,
    },

    /// Flag a bike for maintenance
    Maintenance {
        #[arg(long)]
        bike: String,
    },

    /// Show ride history and statistics
    History(HistoryArgs),
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RegisterArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "QWIKRIDE_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, default_value = "")]
    pub payment_info: String,
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct PeriodArgs {
    /// Start of the period (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub start: Option<String>,
    /// End of the period (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub end: Option<String>,
}

/// Plan fields. When updating, omitted fields keep their current value.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct PlanArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub base_fee: Option<String>,
    #[arg(long)]
    pub per_minute_rate: Option<String>,
    #[arg(long)]
    pub ebike_surcharge: Option<String>,
    /// NONE, STANDARD or PREMIUM
    #[arg(long)]
    pub tier: Option<MembershipTier>,
    #[arg(long)]
    pub city: Option<String>,
    /// YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub effective_from: Option<String>,
    /// YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub effective_to: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Save without publishing
    #[arg(long)]
    pub draft: bool,
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct HistoryArgs {
    /// Show a single ride
    #[arg(long)]
    pub ride: Option<i64>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// COMPLETED, IN_PROGRESS or CANCELLED
    #[arg(long)]
    pub status: Option<RideStatus>,
    #[arg(long)]
    pub bike_type: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub size: Option<u32>,
}
