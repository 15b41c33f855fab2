//! Activity log: the bounded, newest-first event list shown on the dashboard.
//!
//! The store keeps at most `capacity` entries. New entries are pushed to the
//! front and the oldest ones fall off the tail, strictly by insertion order.
//! While paused, appends are dropped (not queued): resuming never backfills.
//!
//! Rendering is delegated to an optional [`LogObserver`], which receives the
//! full current sequence after every change.

pub mod export;

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 100;

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// Category of an activity-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Info,
    Success,
    Warning,
    Error,
    Security,
    Tool,
}

impl LogKind {
    /// Upper-case label used in exports and the console.
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Security => "SECURITY",
            Self::Tool => "TOOL",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single immutable activity-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Creation time in epoch milliseconds, strictly increasing per store.
    pub id: i64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
    /// RFC 3339 creation time in UTC.
    pub date: String,
}

impl LogEntry {
    /// Render as an export line: `[HH:MM:SS] TYPE: message`.
    pub fn to_line(&self) -> String {
        format!("[{}] {}: {}", self.timestamp, self.kind.label(), self.message)
    }
}

/// Display-refresh collaborator notified after each change to the store.
pub trait LogObserver {
    fn refresh(&self, entries: &VecDeque<LogEntry>);
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Bounded newest-first activity log with pause semantics.
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    paused: bool,
    last_id: i64,
    observer: Option<Box<dyn LogObserver>>,
}

impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("paused", &self.paused)
            .finish()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogStore {
    /// Create an empty store. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            paused: false,
            last_id: 0,
            observer: None,
        }
    }

    /// Attach the display-refresh collaborator.
    pub fn set_observer(&mut self, observer: Box<dyn LogObserver>) {
        self.observer = Some(observer);
    }

    /// Append an entry at the front. Dropped silently while paused.
    pub fn append(&mut self, kind: LogKind, message: impl Into<String>) {
        if self.paused {
            return;
        }
        self.push_entry(kind, message.into(), Utc::now());
    }

    /// Empty the log regardless of pause state, then record the clear.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.redisplay();
        self.append(LogKind::System, "Activity log cleared");
    }

    /// Stop accepting entries. Entries appended while paused are lost.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Accept entries again and redisplay the unchanged sequence.
    pub fn resume(&mut self) {
        self.paused = false;
        self.append(LogKind::Info, "Log updates resumed");
        self.redisplay();
    }

    /// Render the whole log as plain text, newest first.
    pub fn export_text(&self) -> Result<String, DashError> {
        if self.entries.is_empty() {
            return Err(DashError::EmptyLog);
        }
        Ok(self
            .entries
            .iter()
            .map(LogEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recently appended entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn count_kind(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    // -- Internal --

    fn push_entry(&mut self, kind: LogKind, message: String, now: DateTime<Utc>) {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        let entry = LogEntry {
            id,
            timestamp: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
            kind,
            message,
            date: now.to_rfc3339(),
        };

        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        self.redisplay();
    }

    fn redisplay(&self) {
        if let Some(observer) = &self.observer {
            observer.refresh(&self.entries);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
