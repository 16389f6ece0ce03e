// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::output_buffer::OutputBuffer;
use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;

/// One tick of test time.
pub const TIME_UNIT: Duration = Duration::from_millis(10);

/// Sleeps for `units` ticks of [`TIME_UNIT`].
pub async fn pause_units(units: u32) {
    sleep(TIME_UNIT * units).await;
}

/// Writes every value to `buffer`, pausing one [`TIME_UNIT`] before each write.
pub async fn write_sequence<I>(buffer: &OutputBuffer, values: I)
where
    I: IntoIterator,
    I::Item: Display,
{
    for value in values {
        pause_units(1).await;
        buffer.write(value);
    }
}

/// Like [`write_sequence`], but checks `should_stop` after each write and returns early
/// once it reports `true`.
///
/// Returns the number of values written.
pub async fn write_sequence_until<I, P>(buffer: &OutputBuffer, values: I, should_stop: P) -> usize
where
    I: IntoIterator,
    I::Item: Display,
    P: Fn() -> bool,
{
    let mut written = 0;
    for value in values {
        pause_units(1).await;
        buffer.write(value);
        written += 1;
        if should_stop() {
            break;
        }
    }
    written
}
