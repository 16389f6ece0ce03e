// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the callqueue workspace
//!
//! Every fallible callqueue operation returns [`CallQueueError`]. The variants are few on
//! purpose: a queued call can time out waiting for the lock, a queue can be disposed twice,
//! and a call body can fail with its own error.
//!
//! # Examples
//!
//! ```
//! use callqueue_error::{CallQueueError, Result};
//! use std::time::Duration;
//!
//! fn acquire() -> Result<()> {
//!     Err(CallQueueError::lock_timeout(Duration::from_millis(50)))
//! }
//!
//! assert!(acquire().unwrap_err().is_timeout());
//! ```

use std::time::Duration;

/// Root error type for all callqueue operations
#[derive(Debug, thiserror::Error)]
pub enum CallQueueError {
    /// The call lock could not be acquired in time
    ///
    /// The call body was never invoked.
    #[error("Timed out after {duration:?} waiting for the call lock")]
    LockTimeout {
        /// How long we waited
        duration: Duration,
    },

    /// `dispose` was called on a queue that is already disposed
    #[error("Call queue has already been disposed")]
    AlreadyDisposed,

    /// Error returned by a caller-supplied call body
    #[error("Call body failed: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CallQueueError {
    /// Create a lock timeout error
    #[must_use]
    pub const fn lock_timeout(duration: Duration) -> Self {
        Self::LockTimeout { duration }
    }

    /// Wrap an error produced by a call body
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Check if this error is a lock acquisition timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }

    /// Check if submitting the same call again could succeed
    ///
    /// A timeout only reflects contention at the time of the attempt.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}

/// Specialized Result type for callqueue operations
///
/// # Examples
///
/// ```
/// use callqueue_error::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CallQueueError>;

/// Extension trait for converting body errors into `CallQueueError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`. A
/// `CallQueueError` converts to itself, so a body that propagates another queue's
/// error with `?` keeps its kind.
pub trait IntoCallQueueError {
    /// Convert this error into a `CallQueueError`
    fn into_call_queue_error(self) -> CallQueueError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoCallQueueError for E {
    fn into_call_queue_error(self) -> CallQueueError {
        let error: Box<dyn std::error::Error + Send + Sync> = Box::new(self);
        match error.downcast::<CallQueueError>() {
            Ok(error) => *error,
            Err(error) => CallQueueError::UserError(error),
        }
    }
}
