// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the serialized session user.
pub const USER_KEY: &str = "user";

/// Durable, client-local key/value storage for session state.
///
/// Implementations must be safe to share between threads. Values are
/// opaque strings; callers own their encoding.
pub trait SessionStorage: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backing store fails.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backing store fails.
    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backing store fails.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Checks that `key` is a non-empty run of ASCII letters, digits, `-` or `_`.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidKey` otherwise.
pub fn validate_key(key: &str) -> Result<(), PersistenceError> {
    let valid: bool = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(PersistenceError::InvalidKey(key.to_string()));
    }
    Ok(())
}
