// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the callqueue workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `OutputBuffer`
//!
//! A shared, clonable string buffer. Tests hand clones to concurrently running call
//! bodies and inspect the interleaving of their writes afterwards:
//!
//! ```rust
//! use callqueue_test_utils::OutputBuffer;
//!
//! let buffer = OutputBuffer::new();
//! let writer = buffer.clone();
//!
//! writer.write(1);
//! writer.write("2");
//! assert_eq!(buffer.contents(), "12");
//! ```
//!
//! ## Write helpers
//!
//! [`helpers::write_sequence`] writes values with a pause before each write, which makes
//! overlapping execution visible in the buffer. Tests run them under Tokio's paused
//! clock, measured in [`helpers::TIME_UNIT`]s.
//!
//! # Module Organization
//!
//! - `output_buffer` - `OutputBuffer` fixture
//! - `helpers` - Timed write sequences and pauses

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod output_buffer;

pub use helpers::{pause_units, write_sequence, write_sequence_until, TIME_UNIT};
pub use output_buffer::OutputBuffer;
