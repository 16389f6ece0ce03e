// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellable delayed-invocation timer.
//!
//! A delayed call is modelled as a small state machine shared between two halves:
//!
//! - [`PendingInvocation`] is kept by whoever may want to cancel the call (the queue's
//!   single pending slot). Dropping it cancels.
//! - [`InvocationTrigger`] moves into the task that sleeps for the delay and then runs
//!   the call.
//!
//! The state starts `Armed` and makes exactly one transition, either to `Fired` (the
//! delay elapsed first) or to `Cancelled`. Both halves race through a compare-and-swap,
//! so a call can never be both cancelled and invoked.
//!
//! # Example
//!
//! ```
//! use callqueue_core::{InvocationState, PendingInvocation, TokioTimer};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (pending, trigger) = PendingInvocation::arm();
//!
//! let task = tokio::spawn(async move {
//!     trigger.wait(&TokioTimer, Duration::from_secs(60)).await
//! });
//!
//! assert!(pending.cancel());
//! assert_eq!(pending.state(), InvocationState::Cancelled);
//!
//! // The sleeping task wakes up early and reports that it must not fire
//! assert!(!task.await.unwrap());
//! # }
//! ```

use crate::timer::Timer;
use core::pin::pin;
use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;
use event_listener::Event;
use futures::future::{select, Either};
use std::sync::Arc;

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Observable state of a delayed invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationState {
    /// Waiting for the delay to elapse
    Armed,
    /// The delay elapsed and the call was released for invocation
    Fired,
    /// Cancelled before the delay elapsed
    Cancelled,
}

#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    cancelled: Event,
}

impl Shared {
    fn state(&self) -> InvocationState {
        match self.state.load(Ordering::Acquire) {
            ARMED => InvocationState::Armed,
            FIRED => InvocationState::Fired,
            _ => InvocationState::Cancelled,
        }
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(ARMED, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn cancel(&self) -> bool {
        let won = self.transition(CANCELLED);
        if won {
            self.cancelled.notify(usize::MAX);
        }
        won
    }
}

/// Cancellation handle for one delayed invocation. Cancels on drop.
#[derive(Debug)]
pub struct PendingInvocation {
    shared: Arc<Shared>,
}

/// Timer half of a delayed invocation, owned by the task that performs the call.
#[derive(Debug)]
pub struct InvocationTrigger {
    shared: Arc<Shared>,
}

impl PendingInvocation {
    /// Creates an armed invocation and returns its two halves.
    #[must_use]
    pub fn arm() -> (Self, InvocationTrigger) {
        let shared = Arc::new(Shared {
            state: AtomicU8::new(ARMED),
            cancelled: Event::new(),
        });
        (
            Self {
                shared: shared.clone(),
            },
            InvocationTrigger { shared },
        )
    }

    /// Cancels the invocation if it has not fired yet.
    ///
    /// Returns `true` if this call performed the cancellation. Cancelling a fired or
    /// already cancelled invocation does nothing and returns `false`.
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }

    pub fn state(&self) -> InvocationState {
        self.shared.state()
    }

    /// Returns `true` while the delay is still running.
    pub fn is_armed(&self) -> bool {
        self.state() == InvocationState::Armed
    }
}

impl Drop for PendingInvocation {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

impl InvocationTrigger {
    /// Sleeps for `delay` unless cancelled first.
    ///
    /// Returns `true` only if the delay elapsed and this trigger won the transition to
    /// `Fired`; the caller must then perform the invocation. Returns `false` if the
    /// invocation was cancelled.
    pub async fn wait<T: Timer>(self, timer: &T, delay: Duration) -> bool {
        let elapsed = pin!(timer.sleep_future(delay));
        let cancelled = pin!(self.cancelled());

        match select(elapsed, cancelled).await {
            Either::Left(((), _)) => self.fire(),
            Either::Right(((), _)) => false,
        }
    }

    /// Fires immediately, without a delay, unless already cancelled.
    pub fn fire(&self) -> bool {
        self.shared.transition(FIRED)
    }

    pub fn state(&self) -> InvocationState {
        self.shared.state()
    }

    async fn cancelled(&self) {
        loop {
            if self.state() == InvocationState::Cancelled {
                return;
            }

            let listener = self.shared.cancelled.listen();

            // cancel() may have run between the check and listen()
            if self.state() == InvocationState::Cancelled {
                return;
            }

            listener.await;
        }
    }
}

impl Drop for InvocationTrigger {
    fn drop(&mut self) {
        // A trigger that goes away without firing can never fire
        self.shared.cancel();
    }
}
