// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qwikride_persistence::PersistenceError;

/// Errors that can occur while changing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Durable storage rejected a read or write.
    Storage(PersistenceError),
    /// The session user could not be encoded.
    Serialization(String),
    /// A login was attempted with an empty bearer token.
    EmptyToken,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "Session storage error: {err}"),
            Self::Serialization(msg) => write!(f, "Session serialization error: {msg}"),
            Self::EmptyToken => write!(f, "Cannot sign in with an empty token"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(err)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
