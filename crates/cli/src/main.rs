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
#![allow(clippy::multiple_crate_versions)]

mod args;
mod commands;
mod error;
mod render;

#[cfg(test)]
mod tests;

use args::Args;
use clap::Parser;
use commands::App;
use error::{CliError, GENERIC_FAILURE};
use qwikride::{Session, SessionStore};
use qwikride_api::{ApiConfig, CredentialSource, DirectorySink, HttpApiClient};
use qwikride_persistence::FileStorage;
use qwikride_workflow::WorkflowContext;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive(args.log_level().into())),
        )
        .with_writer(std::io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic| {
        error!(%panic, "Unexpected failure");
        eprintln!("{GENERIC_FAILURE}");
    }));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Opens the stored session and gateway, then runs the subcommand.
async fn run(args: Args) -> Result<(), CliError> {
    let session: Arc<SessionStore> = Arc::new(SessionStore::new(FileStorage::open(
        &args.state_dir,
    )?));
    let restored: Session = session.hydrate();
    info!(
        state_dir = %args.state_dir.display(),
        authenticated = restored.user.is_some(),
        "Session restored"
    );

    let mut config: ApiConfig = ApiConfig::new(args.api_base_url.as_deref().unwrap_or_default());
    if let Some(seconds) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    let credentials: Arc<dyn CredentialSource> = session.clone();
    let api: HttpApiClient = qwikride_api::connect(&config, credentials)?;

    let ctx = WorkflowContext::new(session, Arc::new(api));
    let mut app = App::new(ctx, DirectorySink::new(&args.download_dir), std::io::stdout());
    app.run(args.command).await
}
