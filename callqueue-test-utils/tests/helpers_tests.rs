// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use callqueue_test_utils::{
    pause_units, write_sequence, write_sequence_until, OutputBuffer, TIME_UNIT,
};
use std::cell::Cell;
use tokio::time::Instant;

#[test]
fn test_output_buffer_clones_share_contents() {
    // Arrange
    let buffer = OutputBuffer::new();
    let writer = buffer.clone();
    assert!(buffer.is_empty());

    // Act
    writer.write('a');
    writer.write(10);

    // Assert
    assert_eq!(buffer.contents(), "a10");
    assert_eq!(buffer.len(), 3);

    buffer.clear();
    assert!(writer.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_write_sequence_pauses_before_each_write() {
    // Arrange
    let buffer = OutputBuffer::new();
    let start = Instant::now();

    // Act
    write_sequence(&buffer, 1..=4).await;

    // Assert
    assert_eq!(buffer.contents(), "1234");
    assert!(start.elapsed() >= TIME_UNIT * 4);
    assert!(start.elapsed() < TIME_UNIT * 5);
}

#[tokio::test(start_paused = true)]
async fn test_write_sequence_until_stops_after_condition() {
    // Arrange
    let buffer = OutputBuffer::new();
    let checks = Cell::new(0);

    // Act
    let written = write_sequence_until(&buffer, ["a", "b", "c", "d"], || {
        checks.set(checks.get() + 1);
        checks.get() == 2
    })
    .await;

    // Assert
    assert_eq!(written, 2);
    assert_eq!(buffer.contents(), "ab");
}

#[tokio::test(start_paused = true)]
async fn test_pause_units_advances_virtual_time() {
    let start = Instant::now();

    pause_units(3).await;

    assert!(start.elapsed() >= TIME_UNIT * 3);
    assert!(start.elapsed() < TIME_UNIT * 4);
}
