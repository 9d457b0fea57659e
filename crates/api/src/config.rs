// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Connection settings for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, without a trailing slash.
    pub base_url: String,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    /// Creates a configuration for `base_url` with no timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let trimmed: &str = base_url.trim().trim_end_matches('/');
        let base_url: String = if trimmed.is_empty() {
            String::from(DEFAULT_BASE_URL)
        } else {
            trimmed.to_string()
        };
        Self {
            base_url,
            timeout: None,
        }
    }

    /// Reads the base URL from `API_BASE_URL`, falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(BASE_URL_ENV)
            .map_or_else(|_| Self::default(), |value| Self::new(&value))
    }

    /// Returns a copy with the given request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
