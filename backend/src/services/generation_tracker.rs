//! Tracking for generation requests.
//!
//! Every request handled by the orchestrator gets an id and a record of its
//! state and progress log, kept in memory for status queries and
//! cancellation.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Lifecycle of one generation request.
///
/// `Pending → Delegated → {Committed | Rejected}`; `Cancelled` may be entered
/// from either non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Pending,
    Delegated,
    Committed,
    Rejected,
    Cancelled,
}

impl GenerationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Rejected | Self::Cancelled)
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Delegated => "delegated",
            Self::Committed => "committed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Request metadata and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub request_id: String,
    pub state: GenerationState,
    pub logs: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of entries committed, once committed.
    pub entry_count: Option<usize>,
}

/// In-memory generation tracker. Clones share the same records.
#[derive(Clone, Default)]
pub struct GenerationTracker {
    records: Arc<RwLock<HashMap<String, GenerationRecord>>>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new Pending request and return its id.
    pub fn create(&self) -> String {
        let request_id = Uuid::new_v4().to_string();
        let record = GenerationRecord {
            request_id: request_id.clone(),
            state: GenerationState::Pending,
            logs: vec![],
            created_at: Utc::now(),
            finished_at: None,
            entry_count: None,
        };
        self.records.write().insert(request_id.clone(), record);
        request_id
    }

    /// Add a log entry to a request.
    pub fn log(&self, request_id: &str, level: LogLevel, message: impl Into<String>) {
        if let Some(record) = self.records.write().get_mut(request_id) {
            record.logs.push(LogEntry {
                timestamp: Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Move a request to `state` unless it already finished.
    ///
    /// Returns the state the request is in afterwards, so a caller racing a
    /// cancellation can see that it lost.
    pub fn transition(&self, request_id: &str, state: GenerationState) -> Option<GenerationState> {
        let mut records = self.records.write();
        let record = records.get_mut(request_id)?;
        if !record.state.is_terminal() {
            record.state = state;
            if state.is_terminal() {
                record.finished_at = Some(Utc::now());
            }
        }
        Some(record.state)
    }

    /// Mark a request committed with the number of entries written.
    pub fn commit(&self, request_id: &str, entry_count: usize) {
        if self.transition(request_id, GenerationState::Committed) == Some(GenerationState::Committed)
        {
            if let Some(record) = self.records.write().get_mut(request_id) {
                record.entry_count = Some(entry_count);
            }
            self.log(
                request_id,
                LogLevel::Success,
                format!("Committed {} entries", entry_count),
            );
        }
    }

    /// Mark a request rejected with the reason.
    pub fn reject(&self, request_id: &str, reason: impl Into<String>) {
        if self.transition(request_id, GenerationState::Rejected) == Some(GenerationState::Rejected) {
            self.log(request_id, LogLevel::Error, reason);
        }
    }

    /// Best-effort cancellation. Returns the state after the attempt, `None`
    /// for unknown ids.
    pub fn cancel(&self, request_id: &str) -> Option<GenerationState> {
        let state = self.transition(request_id, GenerationState::Cancelled)?;
        if state == GenerationState::Cancelled {
            self.log(request_id, LogLevel::Warning, "Cancelled by caller");
        }
        Some(state)
    }

    pub fn is_cancelled(&self, request_id: &str) -> bool {
        self.state(request_id) == Some(GenerationState::Cancelled)
    }

    pub fn state(&self, request_id: &str) -> Option<GenerationState> {
        self.records.read().get(request_id).map(|r| r.state)
    }

    pub fn get(&self, request_id: &str) -> Option<GenerationRecord> {
        self.records.read().get(request_id).cloned()
    }

    /// All tracked requests, newest first.
    pub fn list(&self) -> Vec<GenerationRecord> {
        let mut records: Vec<GenerationRecord> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub fn logs(&self, request_id: &str) -> Vec<LogEntry> {
        self.records
            .read()
            .get(request_id)
            .map(|r| r.logs.clone())
            .unwrap_or_default()
    }
}
