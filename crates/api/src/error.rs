// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API gateway.

use crate::transport::{HttpResponse, TransportError};

/// Every way a backend call can fail.
///
/// Callers map these to user-facing messages; the gateway never retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, expired or insufficient credentials (401 or 403).
    Unauthorized {
        /// The HTTP status received.
        status: u16,
    },
    /// The resource does not exist (404).
    NotFound,
    /// No response was received.
    Unreachable {
        /// Transport-level description of the failure.
        reason: String,
    },
    /// The backend refused the request and said why.
    ServerRejected {
        /// The HTTP status received.
        status: u16,
        /// The server's message, shown verbatim.
        message: String,
    },
    /// Anything else, including undecodable successful responses.
    Unknown {
        /// The HTTP status, if a response was received.
        status: Option<u16>,
        /// Diagnostic detail for logs.
        detail: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { status } => write!(f, "Not authorized (HTTP {status})"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::Unreachable { reason } => write!(f, "Backend unreachable: {reason}"),
            Self::ServerRejected { message, .. } => write!(f, "{message}"),
            Self::Unknown {
                status: Some(status),
                detail,
            } => write!(f, "Unexpected response (HTTP {status}): {detail}"),
            Self::Unknown {
                status: None,
                detail,
            } => write!(f, "Unexpected error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(reason) | TransportError::Timeout(reason) => {
                Self::Unreachable { reason }
            }
            TransportError::Other(detail) => Self::Unknown {
                status: None,
                detail,
            },
        }
    }
}

impl ApiError {
    /// Classifies a non-2xx response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        match response.status {
            401 | 403 => Self::Unauthorized {
                status: response.status,
            },
            404 => Self::NotFound,
            status @ 400..=499 => extract_message(&response.body).map_or_else(
                || Self::Unknown {
                    status: Some(status),
                    detail: String::from("client error without a message"),
                },
                |message| Self::ServerRejected { status, message },
            ),
            status => Self::Unknown {
                status: Some(status),
                detail: extract_message(&response.body)
                    .unwrap_or_else(|| String::from("no message")),
            },
        }
    }

    /// Builds the error for a successful response whose body could not be decoded.
    #[must_use]
    pub fn undecodable(status: u16, err: &serde_json::Error) -> Self {
        Self::Unknown {
            status: Some(status),
            detail: format!("failed to decode response body: {err}"),
        }
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status } | Self::ServerRejected { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            Self::Unreachable { .. } => None,
            Self::Unknown { status, .. } => *status,
        }
    }

    /// Returns whether the session is no longer valid and must be discarded.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { status: 401 })
    }

    /// Returns the server's message for `ServerRejected`, otherwise `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::ServerRejected { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// JSON bodies contribute their `message` or `error` field; any other
/// non-blank body is used as plain text.
fn extract_message(body: &[u8]) -> Option<String> {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        return ["message", "error"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string);
    }
    std::str::from_utf8(body)
        .ok()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
