// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! FIFO mutual-exclusion lock around asynchronous call bodies.
//!
//! `CallLock` guards no data of its own; holding a [`CallLockGuard`] means "my call body
//! is running". Waiters are served strictly in the order they started waiting, and an
//! acquisition attempt can be bounded by a timeout.
//!
//! # Example
//!
//! ```
//! use callqueue_core::{CallLock, TokioTimer};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let lock = CallLock::new();
//!
//! let guard = lock.acquire().await;
//! assert!(lock.is_locked());
//!
//! // A second attempt gives up once the timeout elapses
//! let err = lock
//!     .acquire_within(Duration::from_millis(10), &TokioTimer)
//!     .await
//!     .unwrap_err();
//! assert!(err.is_timeout());
//!
//! drop(guard);
//! assert!(!lock.is_locked());
//! # }
//! ```

use crate::timer::Timer;
use callqueue_error::{CallQueueError, Result};
use core::fmt;
use core::future::Future;
use core::pin::{pin, Pin};
use core::task::{Context, Poll};
use core::time::Duration;
use futures::future::{select, Either};
use futures::task::noop_waker_ref;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type QueuedAcquire = Pin<Box<dyn Future<Output = OwnedMutexGuard<()>> + Send>>;

/// Non-reentrant, FIFO-fair asynchronous lock.
///
/// Clones share the same lock.
#[derive(Clone, Debug, Default)]
pub struct CallLock {
    inner: Arc<Mutex<()>>,
}

/// Proof of holding a [`CallLock`]. The lock is released on drop.
#[derive(Debug)]
pub struct CallLockGuard {
    _guard: OwnedMutexGuard<()>,
}

/// A lock request made by [`CallLock::enqueue`].
///
/// Either already granted, or holding its place in the wait queue. Dropping a queued
/// request leaves the queue.
pub struct LockRequest {
    state: RequestState,
}

enum RequestState {
    Granted(CallLockGuard),
    Queued(QueuedAcquire),
}

impl LockRequest {
    pub fn is_granted(&self) -> bool {
        matches!(self.state, RequestState::Granted(_))
    }

    /// Waits for the request to be granted.
    pub async fn granted(self) -> CallLockGuard {
        match self.state {
            RequestState::Granted(guard) => guard,
            RequestState::Queued(acquire) => CallLockGuard {
                _guard: acquire.await,
            },
        }
    }
}

impl fmt::Debug for LockRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockRequest")
            .field("granted", &self.is_granted())
            .finish()
    }
}

impl CallLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits, in arrival order, until the lock is free and takes it.
    ///
    /// Dropping the returned future before it completes removes the waiter from the
    /// queue without affecting the waiters behind it.
    pub async fn acquire(&self) -> CallLockGuard {
        CallLockGuard {
            _guard: self.inner.clone().lock_owned().await,
        }
    }

    /// Takes the lock if it is free right now.
    pub fn try_acquire(&self) -> Option<CallLockGuard> {
        self.inner
            .clone()
            .try_lock_owned()
            .ok()
            .map(|guard| CallLockGuard { _guard: guard })
    }

    /// Requests the lock without waiting.
    ///
    /// Unlike [`acquire`](Self::acquire), which joins the wait queue on first poll, the
    /// returned request is already granted or already queued when this returns. Waiters
    /// that arrive later are served after it.
    pub fn enqueue(&self) -> LockRequest {
        if let Some(guard) = self.try_acquire() {
            return LockRequest {
                state: RequestState::Granted(guard),
            };
        }

        let mut acquire: QueuedAcquire = Box::pin(self.inner.clone().lock_owned());
        // The first poll registers the waiter; the awaiting task replaces the waker
        let mut cx = Context::from_waker(noop_waker_ref());
        let state = match acquire.as_mut().poll(&mut cx) {
            Poll::Ready(guard) => RequestState::Granted(CallLockGuard { _guard: guard }),
            Poll::Pending => RequestState::Queued(acquire),
        };
        LockRequest { state }
    }

    /// Like [`acquire`](Self::acquire), but gives up after `timeout`.
    ///
    /// A lock that is free when this is first polled is always acquired, even with a
    /// zero timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CallQueueError::LockTimeout`] if the lock was not acquired in time.
    pub async fn acquire_within<T: Timer>(
        &self,
        timeout: Duration,
        timer: &T,
    ) -> Result<CallLockGuard> {
        let acquire = pin!(self.acquire());
        let expired = pin!(timer.sleep_future(timeout));

        match select(acquire, expired).await {
            Either::Left((guard, _)) => Ok(guard),
            Either::Right(((), _)) => Err(CallQueueError::lock_timeout(timeout)),
        }
    }

    /// Acquires with an optional timeout; `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`CallQueueError::LockTimeout`] if a timeout was given and elapsed first.
    pub async fn acquire_timeout<T: Timer>(
        &self,
        timeout: Option<Duration>,
        timer: &T,
    ) -> Result<CallLockGuard> {
        match timeout {
            Some(timeout) => self.acquire_within(timeout, timer).await,
            None => Ok(self.acquire().await),
        }
    }

    /// Snapshot of whether some call currently holds the lock.
    ///
    /// A lock just released to a queued waiter counts as held.
    pub fn is_locked(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}
