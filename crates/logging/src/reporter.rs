//! crates/logging/src/reporter.rs
//! Leveled reporting collaborator passed down through a sync run.

use std::cell::RefCell;
use std::fmt;

use tracing::Level;

/// Sink for the human-readable diagnostics produced during a run.
///
/// Implementations decide where messages go. The trait is object safe so
/// callers pass it around as `&dyn Reporter`.
pub trait Reporter {
    /// Records `message` at `level`.
    fn log(&self, level: Level, message: fmt::Arguments<'_>);

    /// Records a debug message.
    fn debug(&self, message: fmt::Arguments<'_>) {
        self.log(Level::DEBUG, message);
    }

    /// Records an informational message.
    fn info(&self, message: fmt::Arguments<'_>) {
        self.log(Level::INFO, message);
    }

    /// Records a warning.
    fn warn(&self, message: fmt::Arguments<'_>) {
        self.log(Level::WARN, message);
    }

    /// Records an error that the run recovered from.
    fn error(&self, message: fmt::Arguments<'_>) {
        self.log(Level::ERROR, message);
    }
}

/// Forwards every message to the global `tracing` dispatcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, level: Level, message: fmt::Arguments<'_>) {
        // `tracing::event!` needs the level as a constant.
        match level {
            Level::ERROR => tracing::error!(target: "adbsync", "{message}"),
            Level::WARN => tracing::warn!(target: "adbsync", "{message}"),
            Level::INFO => tracing::info!(target: "adbsync", "{message}"),
            Level::DEBUG => tracing::debug!(target: "adbsync", "{message}"),
            Level::TRACE => tracing::trace!(target: "adbsync", "{message}"),
        }
    }
}

/// Captures messages in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded `(level, message)` pair.
    #[must_use]
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    /// Returns the recorded messages at exactly `level`.
    #[must_use]
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Returns `true` when any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, level: Level, message: fmt::Arguments<'_>) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}
