// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::fmt::{Display, Write as _};
use std::sync::Arc;

/// Shared string buffer; clones append to the same contents.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    contents: Arc<Mutex<String>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the `Display` form of `value`.
    pub fn write(&self, value: impl Display) {
        // Writing into a String cannot fail
        let _ = write!(self.contents.lock(), "{value}");
    }

    pub fn contents(&self) -> String {
        self.contents.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.contents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.lock().is_empty()
    }

    pub fn clear(&self) {
        self.contents.lock().clear();
    }
}
