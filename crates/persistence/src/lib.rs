// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable client-local storage for the QwikRide session.
//!
//! The session is stored as two independent keys, [`TOKEN_KEY`] and
//! [`USER_KEY`]. This crate knows nothing about their contents; the
//! session store in `qwikride` owns the encoding and the invariant that
//! both keys are present or both absent.
//!
//! ## Backends
//!
//! - [`FileStorage`] keeps one file per key in a state directory and is
//!   what the command-line client uses.
//! - [`MemoryStorage`] lives only as long as the process and backs tests
//!   and ephemeral runs.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod file;
mod memory;
mod storage;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use storage::{SessionStorage, TOKEN_KEY, USER_KEY, validate_key};
