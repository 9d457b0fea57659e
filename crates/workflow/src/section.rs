// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Independently loaded slice of a view.
///
/// A failed load resets `data` so stale content is never shown next to an
/// error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Section<T> {
    /// Marks a fetch as started, clearing any previous error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Stores freshly fetched data.
    pub fn succeed(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    /// Records a failed fetch and discards the previous data.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.data = T::default();
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Returns the section to its initial empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Feedback from the most recent user action in one area of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Returns whether this notice reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Result of a user action.
///
/// Workflows never surface network errors as `Err`; every failure is
/// described here and recorded in the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran to completion.
    Completed,
    /// The action did not apply to the current state and nothing happened.
    Skipped,
    /// A local check failed; no network call was made.
    Rejected(String),
    /// The backend call failed or the backend reported a failure.
    Failed(String),
}

impl Outcome {
    /// Returns whether the action completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) | Self::Failed(message) => Some(message),
            Self::Completed | Self::Skipped => None,
        }
    }
}
