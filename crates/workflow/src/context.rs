// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qwikride::SessionStore;
use qwikride_api::{ApiClient, ApiError, Transport};
use qwikride_domain::SessionUser;
use std::sync::Arc;
use tracing::warn;

/// Shown when the backend rejects the session token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Shown when the backend refuses an action for the signed-in role.
pub const ACCESS_DENIED_MESSAGE: &str = "You are not authorized to perform this action.";

/// Runs `future` only when `enabled`.
pub(crate) async fn fetch_if<F>(enabled: bool, future: F) -> Option<F::Output>
where
    F: Future,
{
    if enabled { Some(future.await) } else { None }
}

/// What every workflow needs: the session and the gateway.
pub struct WorkflowContext<T> {
    session: Arc<SessionStore>,
    api: Arc<ApiClient<T>>,
}

impl<T> Clone for WorkflowContext<T> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            api: Arc::clone(&self.api),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for WorkflowContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowContext")
            .field("session", &self.session)
            .field("api", &self.api)
            .finish()
    }
}

impl<T: Transport> WorkflowContext<T> {
    /// Bundles the shared session and gateway.
    #[must_use]
    pub const fn new(session: Arc<SessionStore>, api: Arc<ApiClient<T>>) -> Self {
        Self { session, api }
    }

    /// Returns the session store.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Returns the gateway.
    #[must_use]
    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Returns the signed-in user, read fresh from the session.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    /// Maps a failed call to the message shown to the user.
    ///
    /// A 401 also signs the user out so the next screen asks for
    /// credentials again.
    #[must_use]
    pub fn describe_failure(&self, err: &ApiError, fallback: &str) -> String {
        match err {
            ApiError::Unauthorized { status: 401 } => {
                self.expire_session();
                String::from(SESSION_EXPIRED_MESSAGE)
            }
            ApiError::Unauthorized { .. } => String::from(ACCESS_DENIED_MESSAGE),
            _ => err.message_or(fallback),
        }
    }

    /// Signs out after the backend rejected the token.
    pub fn expire_session(&self) {
        warn!("Backend rejected the session token; signing out");
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }
}
