//! Structured terminal output.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of records an [`OutputLog`] keeps.
pub const DEFAULT_OUTPUT_LIMIT: usize = 500;

/// Severity of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Neutral information.
    Info,
    /// A command succeeded.
    Success,
    /// Something worth noticing, not a failure.
    Warning,
    /// A command failed.
    Error,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// One line (or block) of terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Unique id (UUID v7).
    pub id: String,
    /// Severity.
    #[serde(rename = "type")]
    pub kind: OutputKind,
    /// Text to show.
    pub content: String,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
}

impl OutputRecord {
    /// A new record stamped now.
    #[must_use]
    pub fn new(kind: OutputKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Where command output goes.
///
/// The dispatcher never buffers; each record is handed over as soon as a
/// command produces it, so effect sequences show up step by step.
pub trait OutputSink: Send + Sync {
    /// Append a record.
    fn emit(&self, record: OutputRecord);

    /// Empty the output log.
    fn clear(&self);
}

/// Bounded in-memory output log.
///
/// Once full, the oldest records are dropped. Clearing leaves a single
/// `Terminal cleared` notice behind.
#[derive(Debug)]
pub struct OutputLog {
    records: Mutex<VecDeque<OutputRecord>>,
    limit: usize,
}

impl OutputLog {
    /// A log keeping at most `limit` records.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
        }
    }

    /// Snapshot of all records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<OutputRecord> {
        self.lock().iter().cloned().collect()
    }

    /// Remove and return all records.
    #[must_use]
    pub fn drain(&self) -> Vec<OutputRecord> {
        self.lock().drain(..).collect()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<OutputRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_LIMIT)
    }
}

impl OutputSink for OutputLog {
    fn emit(&self, record: OutputRecord) {
        let mut records = self.lock();
        records.push_back(record);
        while records.len() > self.limit {
            records.pop_front();
        }
    }

    fn clear(&self) {
        let mut records = self.lock();
        records.clear();
        records.push_back(OutputRecord::new(OutputKind::Info, "Terminal cleared"));
    }
}
