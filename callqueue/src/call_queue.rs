// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Serialized and debounced execution of asynchronous call bodies.
//!
//! A [`CallQueue`] makes sure that call bodies submitted in quick succession never run
//! concurrently. It offers two ways to submit a body:
//!
//! - [`queue_call`](CallQueue::queue_call) runs the body as soon as every earlier queued
//!   body has finished, and hands its result back to the caller.
//! - [`delay_call`](CallQueue::delay_call) runs the body after a delay that restarts on
//!   every new submission (trailing-edge debounce). Nothing is returned to the caller.
//!
//! Every submission receives a [`CallId`]. A long-running body can poll
//! [`has_calls_waiting_after`](CallQueue::has_calls_waiting_after) between steps and
//! return early once a newer call has been submitted. The queue itself never interrupts
//! a running body.
//!
//! # Runtime Requirements
//!
//! Delayed calls run on tasks spawned with `tokio::spawn`, so [`delay_call`] must be
//! called from within a Tokio runtime.
//!
//! [`delay_call`]: CallQueue::delay_call

use crate::config::CallQueueConfig;
use callqueue_core::{
    CallId, CallIdCounter, CallLock, DefaultTimer, IntoCallQueueError, PendingInvocation,
};
use callqueue_error::{CallQueueError, Result};
use core::future::Future;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Serializes asynchronous call bodies and debounces delayed ones.
///
/// `CallQueue` is a handle: clones share the same counter, lock and pending timer.
/// Each call body receives a clone of the queue together with its call id.
///
/// Bodies are `FnOnce(CallQueue, CallId) -> Fut` where `Fut` resolves to
/// `Result<T, E>`. Synchronous work is simply an `async move` block without awaits;
/// bodies that cannot fail can use `core::convert::Infallible` as their error type.
///
/// # Examples
///
/// ## Serializing calls
///
/// ```
/// use callqueue::CallQueue;
/// use std::convert::Infallible;
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let queue = CallQueue::new();
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let write = |tag: &'static str| {
///     let log = log.clone();
///     queue.queue_call(move |_queue, _id| async move {
///         log.lock().unwrap().push(format!("{tag}:start"));
///         tokio::time::sleep(Duration::from_millis(5)).await;
///         log.lock().unwrap().push(format!("{tag}:end"));
///         Ok::<_, Infallible>(())
///     })
/// };
///
/// let (first, second) = tokio::join!(write("a"), write("b"));
/// first.unwrap();
/// second.unwrap();
///
/// assert_eq!(
///     *log.lock().unwrap(),
///     vec!["a:start", "a:end", "b:start", "b:end"]
/// );
/// # }
/// ```
///
/// ## Abandoning superseded work
///
/// ```
/// use callqueue::CallQueue;
/// use std::convert::Infallible;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let queue = CallQueue::new();
///
/// let slow = queue.queue_call(|queue, id| async move {
///     let mut steps = 0;
///     for _ in 0..100 {
///         tokio::time::sleep(Duration::from_millis(1)).await;
///         steps += 1;
///         if queue.has_calls_waiting_after(id) {
///             break;
///         }
///     }
///     Ok::<_, Infallible>(steps)
/// });
/// let slow = tokio::spawn(slow);
///
/// tokio::time::sleep(Duration::from_millis(10)).await;
/// let fast = queue.queue_call(|_, _| async { Ok::<_, Infallible>(0) });
///
/// assert!(slow.await.unwrap().unwrap() < 100);
/// assert_eq!(fast.await.unwrap(), 0);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CallQueue {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    latest_call_id: CallIdCounter,
    lock: CallLock,
    pending: Mutex<Option<PendingInvocation>>,
    disposed: AtomicBool,
    timer: DefaultTimer,
    config: CallQueueConfig,
}

impl CallQueue {
    /// Creates an active queue with diagnostic logging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CallQueueConfig::default())
    }

    /// Creates an active queue, optionally emitting diagnostic log lines.
    #[must_use]
    pub fn with_logging(logging: bool) -> Self {
        Self::with_config(CallQueueConfig::default().with_logging(logging))
    }

    #[must_use]
    pub fn with_config(config: CallQueueConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                latest_call_id: CallIdCounter::new(),
                lock: CallLock::new(),
                pending: Mutex::new(None),
                disposed: AtomicBool::new(false),
                timer: DefaultTimer::default(),
                config,
            }),
        }
    }

    pub fn config(&self) -> &CallQueueConfig {
        &self.inner.config
    }

    /// Submits `body` to run once every earlier queued body has finished.
    ///
    /// The call id is assigned, and any pending delayed call cancelled, when this method
    /// is called, not when the returned future is first polled. The lock is requested on
    /// first poll; bodies run one at a time in the order their lock requests were made.
    ///
    /// # Errors
    ///
    /// Returns [`CallQueueError::UserError`] wrapping the body's error if the body fails.
    /// The lock is released either way.
    pub fn queue_call<F, Fut, T, E>(&self, body: F) -> impl Future<Output = Result<T>>
    where
        F: FnOnce(CallQueue, CallId) -> Fut,
        Fut: Future<Output = core::result::Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.submit_queued(body, None)
    }

    /// Like [`queue_call`](Self::queue_call), but gives up if the lock cannot be
    /// acquired within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CallQueueError::LockTimeout`] if the lock was not acquired in time; the
    /// body is then never invoked. Body failures are reported as for `queue_call`.
    pub fn queue_call_timeout<F, Fut, T, E>(
        &self,
        body: F,
        timeout: Duration,
    ) -> impl Future<Output = Result<T>>
    where
        F: FnOnce(CallQueue, CallId) -> Fut,
        Fut: Future<Output = core::result::Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.submit_queued(body, Some(timeout))
    }

    fn submit_queued<F, Fut, T, E>(
        &self,
        body: F,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<T>>
    where
        F: FnOnce(CallQueue, CallId) -> Fut,
        Fut: Future<Output = core::result::Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let id = self.inner.latest_call_id.next();
        // An immediate call supersedes a debounce that is still waiting
        self.cancel_pending_delayed_call();
        if self.logging_enabled() {
            debug!("{}: call {} queued", self.label(), id);
        }

        let queue = self.clone();
        async move {
            let _guard = match queue
                .inner
                .lock
                .acquire_timeout(timeout, &queue.inner.timer)
                .await
            {
                Ok(guard) => guard,
                Err(err) => {
                    if queue.logging_enabled() {
                        warn!("{}: call {} not run: {}", queue.label(), id, err);
                    }
                    return Err(err);
                }
            };

            if queue.logging_enabled() {
                debug!("{}: call {} running", queue.label(), id);
            }
            body(queue.clone(), id)
                .await
                .map_err(IntoCallQueueError::into_call_queue_error)
        }
    }

    /// Runs `body` after `delay`, unless another call is submitted first.
    ///
    /// Equivalent to [`delay_call_with`](Self::delay_call_with) with
    /// `prevent_concurrent_access` set to `true`.
    pub fn delay_call<F, Fut, T, E>(&self, body: F, delay: Duration)
    where
        F: FnOnce(CallQueue, CallId) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.delay_call_with(body, delay, true);
    }

    /// Fire-and-forget delayed call with trailing-edge debounce.
    ///
    /// Assigns a new call id and cancels any previously pending delayed call. After
    /// `delay` has elapsed without another submission, the body is invoked with the
    /// queue's latest call id:
    ///
    /// - nothing happens if the queue has been disposed or dropped;
    /// - with `prevent_concurrent_access`, a non-zero delay that expires while a body
    ///   holds the lock is re-armed for another `delay` (as a fresh submission, which
    ///   assigns a new call id); otherwise the body runs under the lock;
    /// - without `prevent_concurrent_access`, the body runs immediately, ignoring the
    ///   lock.
    ///
    /// A zero `delay` skips the timer and is invoked straight away: the lock is taken,
    /// or its place in the wait queue reserved, before this method returns. Such a call
    /// cannot be cancelled by later submissions or by [`dispose`](Self::dispose), and
    /// waits for a busy lock instead of re-arming. On a disposed queue the id is still
    /// assigned but nothing is scheduled.
    ///
    /// Errors returned by the body have no caller to go to; they are logged when
    /// logging is enabled and otherwise dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn delay_call_with<F, Fut, T, E>(
        &self,
        body: F,
        delay: Duration,
        prevent_concurrent_access: bool,
    ) where
        F: FnOnce(CallQueue, CallId) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let id = self.inner.latest_call_id.next();

        if self.is_disposed() {
            if self.logging_enabled() {
                debug!("{}: call {} dropped, queue disposed", self.label(), id);
            }
            return;
        }

        if delay.is_zero() {
            self.cancel_pending_delayed_call();
            if self.logging_enabled() {
                debug!("{}: call {} delayed by zero, invoking", self.label(), id);
            }

            let request = prevent_concurrent_access.then(|| self.inner.lock.enqueue());
            let queue = self.clone();
            tokio::spawn(async move {
                let _guard = match request {
                    Some(request) => Some(request.granted().await),
                    None => None,
                };
                queue.run_delayed(body).await;
            });
            return;
        }

        let (pending, trigger) = PendingInvocation::arm();
        let previous = self.inner.pending.lock().replace(pending);
        // Dropping the previous handle cancels its timer
        drop(previous);

        if self.logging_enabled() {
            debug!("{}: call {} armed for {:?}", self.label(), id, delay);
        }

        let queue = Arc::downgrade(&self.inner);
        let timer = self.inner.timer;
        tokio::spawn(async move {
            if trigger.wait(&timer, delay).await {
                Self::invoke_delayed(queue, body, delay, prevent_concurrent_access).await;
            }
        });
    }

    async fn invoke_delayed<F, Fut, T, E>(
        queue: Weak<Inner>,
        body: F,
        delay: Duration,
        prevent_concurrent_access: bool,
    ) where
        F: FnOnce(CallQueue, CallId) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let Some(inner) = queue.upgrade() else {
            return;
        };
        let queue = Self { inner };

        if queue.is_disposed() {
            if queue.logging_enabled() {
                debug!("{}: delayed call skipped, queue disposed", queue.label());
            }
            return;
        }

        if !prevent_concurrent_access {
            queue.run_delayed(body).await;
            return;
        }

        let Some(_guard) = queue.inner.lock.try_acquire() else {
            if queue.logging_enabled() {
                debug!("{}: lock busy, re-arming delayed call", queue.label());
            }
            queue.delay_call_with(body, delay, true);
            return;
        };
        queue.run_delayed(body).await;
    }

    async fn run_delayed<F, Fut, T, E>(&self, body: F)
    where
        F: FnOnce(CallQueue, CallId) -> Fut,
        Fut: Future<Output = core::result::Result<T, E>>,
        E: std::error::Error,
    {
        let id = self.latest_call_id();
        if self.logging_enabled() {
            debug!("{}: delayed call running as {}", self.label(), id);
        }

        if let Err(err) = body(self.clone(), id).await {
            if self.logging_enabled() {
                warn!("{}: delayed call failed: {}", self.label(), err);
            }
        }
    }

    /// Identifier of the most recently submitted call, immediate or delayed.
    ///
    /// [`CallId::INITIAL`] until the first submission.
    pub fn latest_call_id(&self) -> CallId {
        self.inner.latest_call_id.latest()
    }

    /// Returns `true` if a call was submitted after `call_id`.
    ///
    /// Meant to be polled by a running body between steps of work, so it can stop once
    /// its result is no longer wanted.
    pub fn has_calls_waiting_after(&self, call_id: CallId) -> bool {
        self.inner.latest_call_id.is_superseded(call_id)
    }

    /// Returns `true` while a call body holds the lock.
    pub fn is_busy(&self) -> bool {
        self.inner.lock.is_locked()
    }

    /// Returns `true` while a delayed call is waiting for its timer.
    pub fn has_pending_delayed_call(&self) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(PendingInvocation::is_armed)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Disposes the queue and cancels any pending delayed call.
    ///
    /// A body that is already running completes normally. Delayed calls submitted
    /// afterwards never run; queued calls are not blocked but should not be submitted
    /// to a disposed queue.
    ///
    /// # Errors
    ///
    /// Returns [`CallQueueError::AlreadyDisposed`] if the queue was already disposed.
    pub fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            error!("{}: dispose called twice", self.label());
            return Err(CallQueueError::AlreadyDisposed);
        }

        self.cancel_pending_delayed_call();
        if self.logging_enabled() {
            debug!("{}: disposed", self.label());
        }
        Ok(())
    }

    fn cancel_pending_delayed_call(&self) {
        let previous = self.inner.pending.lock().take();
        if let Some(pending) = previous {
            if pending.cancel() && self.logging_enabled() {
                debug!("{}: pending delayed call cancelled", self.label());
            }
        }
    }

    fn logging_enabled(&self) -> bool {
        self.inner.config.logging
    }

    fn label(&self) -> &str {
        self.inner.config.label()
    }
}

impl Default for CallQueue {
    fn default() -> Self {
        Self::new()
    }
}
