use std::collections::VecDeque;

use chrono::Local;
use serde::Serialize;

/// Shown in an empty log panel; disappears with the first entry.
pub const LOG_PLACEHOLDER: &str = "No requests yet...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    /// Stamps the entry with the local wall-clock time (`HH:MM:SS`).
    pub fn now(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Newest-first list of log entries. Grows without bound.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some(LOG_PLACEHOLDER)
    }

    /// Number of entries whose message contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .count()
    }
}
