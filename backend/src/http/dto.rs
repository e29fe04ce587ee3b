//! Data Transfer Objects for the HTTP API.
//!
//! Domain types that already serialize in their wire shape (timetables,
//! settings, rendered grids) are returned as they are; the types here wrap
//! them or describe request bodies.

use serde::{Deserialize, Serialize};

pub use crate::models::{Entry, ScheduleSettings, Timetable, TimetableInfo};
pub use crate::services::generation::{GenerationOutcome, GenerationRequest};
pub use crate::services::generation_tracker::{GenerationRecord, LogEntry};
pub use crate::services::render::RenderedGrid;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Repository status
    pub repository: String,
}

/// Request body for saving a timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimetableRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Entries to save; the active schedule's entries when absent
    #[serde(default)]
    pub entries: Option<Vec<Entry>>,
    /// Settings the entries belong to; the current settings when absent
    #[serde(default)]
    pub settings: Option<ScheduleSettings>,
}

/// Request body for whole-set entry replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceEntriesRequest {
    pub entries: Vec<Entry>,
}

/// Timetable list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableListResponse {
    /// Summaries, newest first
    pub timetables: Vec<TimetableInfo>,
    /// Total count
    pub total: usize,
}

/// Slot labels and days of the current settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub days: Vec<String>,
    pub slots: Vec<String>,
}

/// Response for a committed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// Generation list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationListResponse {
    pub generations: Vec<GenerationRecord>,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Directory names (faculty or rooms).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamesResponse {
    pub names: Vec<String>,
}
