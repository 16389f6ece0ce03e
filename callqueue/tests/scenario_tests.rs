// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use callqueue::CallQueue;
use callqueue_test_utils::{
    pause_units, write_sequence, write_sequence_until, OutputBuffer, TIME_UNIT,
};
use futures::future::join;
use std::convert::Infallible;

#[tokio::test(start_paused = true)]
async fn test_unqueued_sequences_interleave() {
    // Arrange
    let buffer = OutputBuffer::new();

    // Act
    tokio::join!(
        write_sequence(&buffer, 1..=4),
        write_sequence(&buffer, 1..=4)
    );

    // Assert
    assert_eq!(buffer.contents(), "11223344");
}

#[tokio::test(start_paused = true)]
async fn test_queued_sequences_are_serialized() -> anyhow::Result<()> {
    // Arrange
    let queue = CallQueue::new();
    let buffer = OutputBuffer::new();

    let sequence = |queue: &CallQueue| {
        let buffer = buffer.clone();
        queue.queue_call(move |_, _| async move {
            write_sequence(&buffer, 1..=4).await;
            Ok::<_, Infallible>(())
        })
    };

    // Act
    let (first, second) = tokio::join!(sequence(&queue), sequence(&queue));
    first?;
    second?;

    // Assert
    assert_eq!(buffer.contents(), "12341234");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_superseded_call_returns_early() -> anyhow::Result<()> {
    // Arrange
    let queue = CallQueue::new();
    let buffer = OutputBuffer::new();

    let first = tokio::spawn(queue.queue_call({
        let buffer = buffer.clone();
        move |queue, id| async move {
            let written =
                write_sequence_until(&buffer, 1..=3, || queue.has_calls_waiting_after(id)).await;
            Ok::<_, Infallible>(written)
        }
    }));

    // Act: submit between the first and second write of the running call
    tokio::time::sleep(TIME_UNIT * 3 / 2).await;
    let second = queue.queue_call({
        let buffer = buffer.clone();
        move |_, _| async move {
            write_sequence(&buffer, 1..=4).await;
            Ok::<_, Infallible>(())
        }
    });
    second.await?;

    // Assert
    assert_eq!(first.await??, 2);
    assert_eq!(buffer.contents(), "121234");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_call_submitted_at_second_write_supersedes_it() -> anyhow::Result<()> {
    // Arrange
    let queue = CallQueue::new();
    let buffer = OutputBuffer::new();

    let first = queue.queue_call({
        let buffer = buffer.clone();
        move |queue, id| async move {
            let written =
                write_sequence_until(&buffer, 1..=3, || queue.has_calls_waiting_after(id)).await;
            Ok::<_, Infallible>(written)
        }
    });
    let submit_second = async {
        tokio::time::sleep(TIME_UNIT * 2).await;
        queue
            .queue_call({
                let buffer = buffer.clone();
                move |_, _| async move {
                    write_sequence(&buffer, 1..=4).await;
                    Ok::<_, Infallible>(())
                }
            })
            .await
    };

    // Act: both wake at the same instant; `join` polls the submission first, so it
    // lands before the running call checks for newer calls after writing "2"
    let (second, first) = join(submit_second, first).await;
    second?;

    // Assert
    assert_eq!(first?, 2);
    assert_eq!(buffer.contents(), "121234");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounced_burst_runs_only_last_call() {
    // Arrange
    let queue = CallQueue::new();
    let buffer = OutputBuffer::new();

    // Act
    for _ in 0..10 {
        let buffer = buffer.clone();
        queue.delay_call(
            move |_, id| async move {
                buffer.write(id);
                Ok::<_, Infallible>(())
            },
            TIME_UNIT * 5,
        );
        pause_units(1).await;
    }
    pause_units(10).await;

    // Assert
    assert_eq!(buffer.contents(), "10");
}
