// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use qwikride_domain::SessionUser;
use qwikride_persistence::{PersistenceError, SessionStorage, TOKEN_KEY, USER_KEY};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// In-memory session state.
///
/// A token without a user (or the reverse) is not representable.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Durable storage has not been read yet.
    Uninitialized,
    /// Nobody is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated {
        /// Bearer token presented on every request.
        token: String,
        /// Identity of the signed-in user.
        user: SessionUser,
    },
}

impl SessionState {
    /// Returns whether hydration has not completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }
}

/// Read-only view of the session handed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Signed-in user, if any.
    pub user: Option<SessionUser>,
    /// Bearer token, present exactly when `user` is.
    pub token: Option<String>,
    /// True until the stored session has been read.
    pub loading: bool,
}

impl From<&SessionState> for Session {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Uninitialized => Self {
                user: None,
                token: None,
                loading: true,
            },
            SessionState::Anonymous => Self {
                user: None,
                token: None,
                loading: false,
            },
            SessionState::Authenticated { token, user } => Self {
                user: Some(user.clone()),
                token: Some(token.clone()),
                loading: false,
            },
        }
    }
}

/// The single source of truth for who is signed in.
///
/// Share one instance per process behind an `Arc`. Every mutation writes
/// durable storage first and only then updates memory; mutations are
/// serialized by an internal lock, so the last write wins.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an unhydrated store over `storage`.
    #[must_use]
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    /// Creates an unhydrated store over boxed storage.
    #[must_use]
    pub fn from_boxed(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(SessionState::Uninitialized),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the stored session into memory.
    ///
    /// Runs once; later calls return the current session unchanged. A
    /// missing key, an unreadable key or a malformed user record all
    /// yield an anonymous session rather than an error.
    pub fn hydrate(&self) -> Session {
        let mut state = self.lock();
        if !state.is_loading() {
            return Session::from(&*state);
        }

        *state = match self.read_stored() {
            Some((token, user)) => {
                info!(user_id = user.id, username = %user.username, "Restored session");
                SessionState::Authenticated { token, user }
            }
            None => {
                debug!("No stored session");
                SessionState::Anonymous
            }
        };
        Session::from(&*state)
    }

    fn read_stored(&self) -> Option<(String, SessionUser)> {
        let read = |key: &str| -> Option<String> {
            match self.storage.read(key) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "Failed to read stored session");
                    None
                }
            }
        };

        let token: Option<String> = read(TOKEN_KEY).filter(|t| !t.is_empty());
        let raw_user: Option<String> = read(USER_KEY);
        match (token, raw_user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<SessionUser>(&raw_user) {
                Ok(user) => Some((token, user)),
                Err(e) => {
                    warn!(error = %e, "Stored session user is malformed; starting signed out");
                    None
                }
            },
            (None, None) => None,
            _ => {
                warn!("Stored session is incomplete; starting signed out");
                None
            }
        }
    }

    /// Records a successful sign-in.
    ///
    /// No network call is made; the caller has already authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or storage rejects the write.
    /// On error the in-memory session is unchanged and no half-written
    /// pair is left in storage.
    pub fn login(&self, token: String, user: SessionUser) -> Result<(), CoreError> {
        if token.is_empty() {
            return Err(CoreError::EmptyToken);
        }
        let encoded: String = serde_json::to_string(&user)?;

        let mut state = self.lock();
        self.storage.write(TOKEN_KEY, &token)?;
        if let Err(e) = self.storage.write(USER_KEY, &encoded) {
            if let Err(rollback) = self.storage.remove(TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back token after user write failed");
            }
            return Err(e.into());
        }

        info!(user_id = user.id, role = %user.role, "Signed in");
        *state = SessionState::Authenticated { token, user };
        Ok(())
    }

    /// Signs out. Signing out twice is harmless.
    ///
    /// Memory is always cleared, even if removing a stored key fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn logout(&self) -> Result<(), CoreError> {
        let mut state = self.lock();
        let token_result: Result<(), PersistenceError> = self.storage.remove(TOKEN_KEY);
        let user_result: Result<(), PersistenceError> = self.storage.remove(USER_KEY);

        if matches!(*state, SessionState::Authenticated { .. }) {
            info!("Signed out");
        }
        *state = SessionState::Anonymous;
        drop(state);
        token_result?;
        user_result?;
        Ok(())
    }

    /// Applies `updater` to the signed-in user.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the user changed and was persisted
    /// * `Ok(false)` if nobody is signed in or the user is unchanged
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the write; memory is unchanged.
    pub fn update_user<F>(&self, updater: F) -> Result<bool, CoreError>
    where
        F: FnOnce(&SessionUser) -> SessionUser,
    {
        let mut state = self.lock();
        let SessionState::Authenticated { token, user } = &*state else {
            return Ok(false);
        };

        let next: SessionUser = updater(user);
        if &next == user {
            return Ok(false);
        }

        self.storage.write(USER_KEY, &serde_json::to_string(&next)?)?;
        debug!(user_id = next.id, "Session user updated");
        let token: String = token.clone();
        *state = SessionState::Authenticated { token, user: next };
        Ok(true)
    }

    /// Replaces the signed-in user with `user`.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::update_user`].
    pub fn replace_user(&self, user: SessionUser) -> Result<bool, CoreError> {
        self.update_user(move |_| user)
    }

    fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Returns the current session view.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::from(&self.snapshot())
    }

    /// Returns the signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        match self.snapshot() {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Returns the bearer token of the signed-in user.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        match self.snapshot() {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Returns whether somebody is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.snapshot(), SessionState::Authenticated { .. })
    }
}
