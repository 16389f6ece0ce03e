// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Keep asynchronous calls from overlapping.
//!
//! [`CallQueue`] runs call bodies one at a time through a FIFO lock, tags every
//! submission with a [`CallId`] so running bodies can notice when they have been
//! superseded, and debounces delayed calls so only the last of a burst runs.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;

pub mod call_queue;
pub mod config;

// Re-export commonly used types
pub use call_queue::CallQueue;
pub use callqueue_core::{CallId, CallLock, CallLockGuard};
pub use callqueue_error::{CallQueueError, Result};
pub use config::CallQueueConfig;
