//! Timetable aggregate and its listing summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::settings::ScheduleSettings;
use crate::define_id_type;

define_id_type!(i64, TimetableId);

/// Description stored when a caller saves without one.
pub const DEFAULT_DESCRIPTION: &str = "Generated Timetable";

/// A persisted timetable: its entries and the settings that produced them.
///
/// `id` is `None` until the repository assigns one on first store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TimetableId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
    pub settings: ScheduleSettings,
    pub created_at: DateTime<Utc>,
}

impl Timetable {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        entries: Vec<Entry>,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            entries,
            settings,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self, id: TimetableId) -> TimetableInfo {
        TimetableInfo {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            entry_count: self.entries.len(),
            created_at: self.created_at,
        }
    }
}

/// Lightweight listing row for a stored timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableInfo {
    pub id: TimetableId,
    pub title: String,
    pub description: String,
    pub entry_count: usize,
    pub created_at: DateTime<Utc>,
}

/// The current working entry set, replaced wholesale by each generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSchedule {
    pub entries: Vec<Entry>,
    pub settings: ScheduleSettings,
    pub generated_at: DateTime<Utc>,
}

impl ActiveSchedule {
    pub fn new(entries: Vec<Entry>, settings: ScheduleSettings) -> Self {
        Self {
            entries,
            settings,
            generated_at: Utc::now(),
        }
    }
}
