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

//! The API gateway: the only code in the client that talks to the network.
//!
//! Requests flow through a [`Transport`]. [`ReqwestTransport`] talks HTTP;
//! [`BearerAuth`] wraps any transport and attaches the session token.
//! [`ApiClient`] exposes one typed method per backend endpoint and
//! classifies failures into [`ApiError`].

mod auth;
mod client;
mod config;
mod download;
mod error;
mod transport;

#[cfg(test)]
mod tests;

pub use auth::{AUTHORIZATION_HEADER, BearerAuth, CredentialSource};
pub use client::{ApiClient, ApiResponse};
pub use config::{ApiConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use download::{
    DirectorySink, Download, DownloadSink, LEDGER_EXPORT_FILENAME, receipt_filename,
};
pub use error::ApiError;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

/// The production client: reqwest with bearer-token attachment.
pub type HttpApiClient = ApiClient<BearerAuth<ReqwestTransport>>;

/// Builds the production client for `config`, reading tokens from `credentials`.
///
/// # Errors
///
/// Returns `TransportError::Other` if the HTTP client cannot be built.
pub fn connect(
    config: &ApiConfig,
    credentials: std::sync::Arc<dyn CredentialSource>,
) -> Result<HttpApiClient, TransportError> {
    let transport: ReqwestTransport = ReqwestTransport::new(config)?;
    Ok(ApiClient::new(BearerAuth::new(transport, credentials)))
}
