// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Role;
use crate::validation::require_text;
use serde::{Deserialize, Serialize};

/// The identity of the signed-in user as held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend user identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Role that gates operator-only actions.
    pub role: Role,
    /// Sum of unsettled charges, refreshed from billing history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_balance: Option<f64>,
}

impl SessionUser {
    /// Creates a new `SessionUser` with no known pending balance.
    #[must_use]
    pub const fn new(id: i64, username: String, full_name: String, role: Role) -> Self {
        Self {
            id,
            username,
            full_name,
            role,
            pending_balance: None,
        }
    }

    /// Returns whether this user holds the operator role.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        self.role.is_operator()
    }

    /// Returns a copy of this user carrying the given pending balance.
    #[must_use]
    pub fn with_pending_balance(&self, balance: f64) -> Self {
        Self {
            pending_balance: Some(balance),
            ..self.clone()
        }
    }
}

/// Credentials submitted to `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl LoginRequest {
    /// Builds a login request from raw form input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if either field is blank.
    pub fn new(username: &str, password: &str) -> Result<Self, DomainError> {
        let username: String = require_text(username, "Username")?;
        if password.is_empty() {
            return Err(DomainError::MissingField("Password"));
        }
        Ok(Self {
            username,
            password: password.to_string(),
        })
    }
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Role of the user.
    pub role: Role,
    /// Backend user identifier.
    pub id: i64,
}

impl LoginResponse {
    /// Splits the response into the token and the session identity.
    #[must_use]
    pub fn into_session(self) -> (String, SessionUser) {
        let user: SessionUser = SessionUser::new(self.id, self.username, self.full_name, self.role);
        (self.token, user)
    }
}

/// Account returned by `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Account details submitted to `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub full_name: String,
    /// Postal address.
    pub address: String,
    /// Contact email.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Payment details captured at sign-up.
    pub payment_info: String,
}

impl RegisterRequest {
    /// Validates the required fields and returns a trimmed copy.
    ///
    /// The password is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` naming the first blank required field.
    pub fn validated(&self) -> Result<Self, DomainError> {
        let full_name: String = require_text(&self.full_name, "Full name")?;
        let email: String = require_text(&self.email, "Email")?;
        let username: String = require_text(&self.username, "Username")?;
        if self.password.is_empty() {
            return Err(DomainError::MissingField("Password"));
        }
        Ok(Self {
            full_name,
            address: self.address.trim().to_string(),
            email,
            username,
            password: self.password.clone(),
            payment_info: self.payment_info.trim().to_string(),
        })
    }
}
