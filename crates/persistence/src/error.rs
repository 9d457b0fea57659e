// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while reading or writing client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The key contains characters that cannot name a storage slot.
    InvalidKey(String),
    /// The state directory could not be created or opened.
    InitializationError {
        /// The directory that failed.
        path: String,
        /// The underlying error message.
        message: String,
    },
    /// Reading a key failed.
    ReadFailed {
        /// The key being read.
        key: String,
        /// The underlying error message.
        message: String,
    },
    /// Writing a key failed.
    WriteFailed {
        /// The key being written.
        key: String,
        /// The underlying error message.
        message: String,
    },
    /// Removing a key failed.
    RemoveFailed {
        /// The key being removed.
        key: String,
        /// The underlying error message.
        message: String,
    },
    /// A stored value is not valid UTF-8.
    CorruptValue(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "Invalid storage key: '{key}'"),
            Self::InitializationError { path, message } => {
                write!(f, "Cannot open state directory {path}: {message}")
            }
            Self::ReadFailed { key, message } => write!(f, "Failed to read '{key}': {message}"),
            Self::WriteFailed { key, message } => {
                write!(f, "Failed to write '{key}': {message}")
            }
            Self::RemoveFailed { key, message } => {
                write!(f, "Failed to remove '{key}': {message}")
            }
            Self::CorruptValue(key) => write!(f, "Stored value for '{key}' is not valid text"),
        }
    }
}

impl std::error::Error for PersistenceError {}
