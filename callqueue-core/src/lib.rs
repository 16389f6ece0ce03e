// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod call_id;
pub mod call_lock;
pub mod pending_invocation;
pub mod timer;

pub use self::call_id::{CallId, CallIdCounter};
pub use self::call_lock::{CallLock, CallLockGuard, LockRequest};
pub use self::pending_invocation::{InvocationState, InvocationTrigger, PendingInvocation};
pub use self::timer::{DefaultTimer, Timer, TokioTimer};
pub use callqueue_error::{CallQueueError, IntoCallQueueError, Result};
