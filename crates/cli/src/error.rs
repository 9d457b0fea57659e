// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qwikride_api::TransportError;
use qwikride_persistence::PersistenceError;

/// Shown for any failure that is not the result of a user action.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that end a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The session directory could not be opened.
    #[error("failed to open session storage: {0}")]
    Storage(#[from] PersistenceError),

    /// The HTTP client could not be built.
    #[error("failed to build the HTTP client: {0}")]
    Client(#[from] TransportError),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// An action was refused or failed; the message is meant for the user.
    #[error("{0}")]
    Action(String),
}

impl CliError {
    pub fn action(message: impl Into<String>) -> Self {
        Self::Action(message.into())
    }

    /// Text shown to the user. Internal failures are not described.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Action(message) => message,
            Self::Storage(_) | Self::Client(_) | Self::Output(_) => GENERIC_FAILURE,
        }
    }
}
