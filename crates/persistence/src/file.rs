// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::storage::{SessionStorage, validate_key};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage that keeps one file per key inside a state directory.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the state directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InitializationError` if the directory cannot
    /// be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let root: PathBuf = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| PersistenceError::InitializationError {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %root.display(), "Opened session state directory");
        Ok(Self { root })
    }

    /// Returns the state directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path: PathBuf = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| PersistenceError::CorruptValue(key.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path: PathBuf = self.path_for(key)?;
        let staging: PathBuf = self.root.join(format!(".{key}.tmp"));
        let to_error = |e: std::io::Error| PersistenceError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };

        let mut file: fs::File = fs::File::create(&staging).map_err(to_error)?;
        file.write_all(value.as_bytes()).map_err(to_error)?;
        file.sync_all().map_err(to_error)?;
        drop(file);
        fs::rename(&staging, &path).map_err(to_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path: PathBuf = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::RemoveFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
