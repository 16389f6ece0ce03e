// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use callqueue_error::{CallQueueError, IntoCallQueueError, Result};
use std::error::Error;
use std::io;
use std::time::Duration;

#[test]
fn test_error_display() {
    let err = CallQueueError::lock_timeout(Duration::from_millis(250));
    assert_eq!(
        err.to_string(),
        "Timed out after 250ms waiting for the call lock"
    );

    let err = CallQueueError::AlreadyDisposed;
    assert_eq!(err.to_string(), "Call queue has already been disposed");

    let err = CallQueueError::user_error(io::Error::other("disk full"));
    assert_eq!(err.to_string(), "Call body failed: disk full");
}

#[test]
fn test_classification() {
    assert!(CallQueueError::lock_timeout(Duration::ZERO).is_timeout());
    assert!(CallQueueError::lock_timeout(Duration::ZERO).is_recoverable());

    assert!(!CallQueueError::AlreadyDisposed.is_timeout());
    assert!(!CallQueueError::AlreadyDisposed.is_recoverable());

    let err = CallQueueError::user_error(io::Error::other("boom"));
    assert!(!err.is_timeout());
    assert!(!err.is_recoverable());
}

#[test]
fn test_user_error_keeps_source() {
    let err = io::Error::new(io::ErrorKind::NotFound, "missing").into_call_queue_error();

    let source = err.source().expect("user error should expose its source");
    let io_err = source
        .downcast_ref::<io::Error>()
        .expect("source should be the original io::Error");
    assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn test_call_queue_error_converts_to_itself() {
    let err = CallQueueError::lock_timeout(Duration::from_millis(10)).into_call_queue_error();
    assert!(err.is_timeout());
    assert!(matches!(
        err,
        CallQueueError::LockTimeout { duration } if duration == Duration::from_millis(10)
    ));

    let err = CallQueueError::AlreadyDisposed.into_call_queue_error();
    assert!(matches!(err, CallQueueError::AlreadyDisposed));
}

#[test]
fn test_result_alias_with_question_mark() {
    fn inner() -> Result<u32> {
        Err(CallQueueError::AlreadyDisposed)
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(CallQueueError::AlreadyDisposed)));
}
