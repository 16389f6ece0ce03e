// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use core::future::Future;
use core::time::Duration;

/// Source of the sleeps behind lock timeouts and delayed calls.
pub trait Timer: Clone + Send + Sync + Debug + 'static {
    type Sleep: Future<Output = ()> + Send;

    /// Creates a future that completes once `duration` has elapsed.
    fn sleep_future(&self, duration: Duration) -> Self::Sleep;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    // Follows paused/advanced test time
    fn sleep_future(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

pub type DefaultTimer = TokioTimer;
