// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

const DEFAULT_LABEL: &str = "call-queue";

/// Construction-time settings for a [`CallQueue`](crate::CallQueue).
///
/// ```
/// use callqueue::CallQueueConfig;
///
/// let config = CallQueueConfig::new().with_name("search").with_logging(true);
/// assert_eq!(config.label(), "search");
/// assert!(config.logging);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallQueueConfig {
    /// Name shown in diagnostic log lines
    pub name: Option<String>,
    /// Emit diagnostic log lines for submissions, invocations and disposal
    pub logging: bool,
}

impl CallQueueConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// The configured name, or a generic label for unnamed queues.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }
}
