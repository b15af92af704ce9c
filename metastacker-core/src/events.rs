//! Run event log.
//!
//! Stages record progress into an explicit `EventLog` handle rather than a
//! process-wide logger. Each event is mirrored to `tracing` at the same level
//! so a console subscriber sees it live, and the collected sequence is
//! rendered into the log file once the run ends.

use chrono::{DateTime, Local};
use tracing::Level;

/// Timestamp layout used in rendered log lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One severity-tagged log event.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl LogEvent {
    /// Render as `YYYY-MM-DD HH:MM:SS,mmm - LEVEL - message`.
    pub fn render(&self) -> String {
        format!(
            "{} - {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        )
    }
}

/// Ordered, append-only collection of events for a single run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LogEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and forward it to `tracing`.
    pub fn record(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::ERROR => tracing::error!(target: "metastacker", "{message}"),
            Level::WARN => tracing::warn!(target: "metastacker", "{message}"),
            Level::INFO => tracing::info!(target: "metastacker", "{message}"),
            Level::DEBUG => tracing::debug!(target: "metastacker", "{message}"),
            Level::TRACE => tracing::trace!(target: "metastacker", "{message}"),
        }
        self.events.push(LogEvent {
            timestamp: Local::now(),
            level,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Level::INFO, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Level::WARN, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Level::ERROR, message);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(Level::DEBUG, message);
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Messages in emission order, without timestamps or levels.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Render every event at `max_level` or more severe, one line each.
    ///
    /// `tracing` orders levels by verbosity, so `ERROR < WARN < INFO < DEBUG`.
    pub fn render(&self, max_level: Level) -> String {
        let mut out = String::new();
        for event in self.events.iter().filter(|e| e.level <= max_level) {
            out.push_str(&event.render());
            out.push('\n');
        }
        out
    }
}
