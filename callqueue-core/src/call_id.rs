// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Call identifiers.
//!
//! Every submission to a call queue, immediate or delayed, takes the next identifier
//! from a [`CallIdCounter`]. Identifiers are assigned synchronously, so their order
//! always matches the order in which submissions were made.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one submitted call.
///
/// The counter that produces identifiers starts at 0, so the first submission
/// receives `CallId(1)` and `CallId::INITIAL` means "nothing submitted yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CallId(u64);

impl CallId {
    /// Identifier reported before any call has been submitted.
    pub const INITIAL: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CallId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<CallId> for u64 {
    fn from(id: CallId) -> Self {
        id.0
    }
}

/// Monotonic source of [`CallId`]s.
///
/// The counter is 64 bits wide. Past `u64::MAX` it wraps back to 0 instead of
/// overflowing; at one submission per nanosecond that takes over five centuries.
#[derive(Debug, Default)]
pub struct CallIdCounter {
    latest: AtomicU64,
}

impl CallIdCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(CallId::INITIAL)
    }

    /// Creates a counter whose latest identifier is `latest`.
    #[must_use]
    pub const fn starting_at(latest: CallId) -> Self {
        Self {
            latest: AtomicU64::new(latest.0),
        }
    }

    /// Assigns and records the next identifier.
    pub fn next(&self) -> CallId {
        // fetch_add wraps on overflow
        let previous = self.latest.fetch_add(1, Ordering::AcqRel);
        CallId(previous.wrapping_add(1))
    }

    /// Identifier of the most recently submitted call.
    pub fn latest(&self) -> CallId {
        CallId(self.latest.load(Ordering::Acquire))
    }

    /// Returns `true` if a call was submitted after `id`.
    pub fn is_superseded(&self, id: CallId) -> bool {
        self.latest() != id
    }
}
