// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qwikride_domain::{Role, SessionUser};
use qwikride_persistence::{MemoryStorage, PersistenceError, SessionStorage};
use std::sync::Arc;

pub fn create_test_user() -> SessionUser {
    SessionUser::new(
        7,
        String::from("rider7"),
        String::from("Rider Seven"),
        Role::Rider,
    )
}

pub fn create_test_operator() -> SessionUser {
    SessionUser::new(
        1,
        String::from("ops"),
        String::from("Operations"),
        Role::Operator,
    )
}

/// Storage shared with the test so it can inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct SharedStorage(pub Arc<MemoryStorage>);

impl SessionStorage for SharedStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.0.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.0.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.0.remove(key)
    }
}

/// Storage that refuses writes to one key.
#[derive(Debug, Default)]
pub struct RejectingStorage {
    pub inner: SharedStorage,
    pub rejected_key: &'static str,
}

impl SessionStorage for RejectingStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if key == self.rejected_key {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                message: String::from("disk full"),
            });
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.inner.remove(key)
    }
}
