// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! The operator console: an append-only, in-memory log of fleet operations.
//!
//! Entries are never persisted. The console keeps only the most recent
//! entries, dropping the oldest once its capacity is reached.

use std::collections::VecDeque;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing::{error, info, warn};

/// Number of entries retained when no capacity is given.
pub const DEFAULT_CONSOLE_CAPACITY: usize = 100;

const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Severity of a console entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleLevel {
    /// An operation completed.
    Success,
    /// An operation failed or was refused.
    Error,
    /// Something needs attention but nothing failed.
    Warning,
    /// Informational notice.
    Info,
}

impl ConsoleLevel {
    /// Converts this level to its display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line in the operator console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    /// Monotonically increasing identifier, unique for the console's lifetime.
    pub id: u64,
    /// Severity.
    pub level: ConsoleLevel,
    /// Human-readable message.
    pub message: String,
    /// When the entry was recorded (UTC).
    pub recorded_at: OffsetDateTime,
}

impl ConsoleEntry {
    /// Returns the recording time as `HH:MM:SS`.
    #[must_use]
    pub fn clock_label(&self) -> String {
        self.recorded_at
            .format(CLOCK_FORMAT)
            .unwrap_or_else(|_| String::from("--:--:--"))
    }
}

impl std::fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {:<7} {}",
            self.clock_label(),
            self.level.as_str(),
            self.message
        )
    }
}

/// Bounded, append-only operation log.
#[derive(Debug, Clone)]
pub struct OperationConsole {
    entries: VecDeque<ConsoleEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for OperationConsole {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_CAPACITY)
    }
}

impl OperationConsole {
    /// Creates an empty console retaining at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity: usize = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Appends an entry, evicting the oldest if the console is full.
    ///
    /// The entry is also emitted as a tracing event.
    pub fn record(&mut self, level: ConsoleLevel, message: impl Into<String>) -> &ConsoleEntry {
        let message: String = message.into();
        match level {
            ConsoleLevel::Error => error!(console_id = self.next_id, "{message}"),
            ConsoleLevel::Warning => warn!(console_id = self.next_id, "{message}"),
            ConsoleLevel::Success | ConsoleLevel::Info => {
                info!(console_id = self.next_id, level = %level, "{message}");
            }
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let entry: ConsoleEntry = ConsoleEntry {
            id: self.next_id,
            level,
            message,
            recorded_at: OffsetDateTime::now_utc(),
        };
        self.next_id += 1;
        self.entries.push_back(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Records a success entry.
    pub fn success(&mut self, message: impl Into<String>) -> &ConsoleEntry {
        self.record(ConsoleLevel::Success, message)
    }

    /// Records an error entry.
    pub fn error(&mut self, message: impl Into<String>) -> &ConsoleEntry {
        self.record(ConsoleLevel::Error, message)
    }

    /// Records a warning entry.
    pub fn warning(&mut self, message: impl Into<String>) -> &ConsoleEntry {
        self.record(ConsoleLevel::Warning, message)
    }

    /// Records an informational entry.
    pub fn info(&mut self, message: impl Into<String>) -> &ConsoleEntry {
        self.record(ConsoleLevel::Info, message)
    }

    /// Removes every entry. Identifiers keep increasing afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    /// Returns the newest entry.
    #[must_use]
    pub fn latest(&self) -> Option<&ConsoleEntry> {
        self.entries.back()
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the console is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
