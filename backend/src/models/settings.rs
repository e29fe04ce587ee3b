//! Institution schedule settings.
//!
//! A `ScheduleSettings` value is the only input of the slot grid. It travels
//! with every entry set it produced, so a stored timetable can always rebuild
//! the exact grid its entries reference.

use serde::{Deserialize, Serialize};

/// Weekdays used when no working days are configured.
pub const DEFAULT_WORKING_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Time-grid parameters plus descriptive institution metadata.
///
/// `start_time` is kept as the raw `HH:MM` string it was configured with;
/// parsing happens in the slot grid so that malformed values surface as a
/// configuration error at render time instead of being rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    #[serde(default)]
    pub institution_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Start of the first slot, `HH:MM` on a 24-hour clock.
    pub start_time: String,
    #[serde(alias = "slotDuration")]
    pub slot_duration_minutes: u32,
    pub slots_per_day: u32,
    /// 1-indexed slot after which the break is inserted; 0 disables the break.
    #[serde(default)]
    pub break_after_slot: u32,
    #[serde(default, alias = "breakDuration")]
    pub break_duration_minutes: u32,
    #[serde(default = "default_working_days")]
    pub working_days: Vec<String>,
}

fn default_working_days() -> Vec<String> {
    DEFAULT_WORKING_DAYS.iter().map(|d| d.to_string()).collect()
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            institution_name: String::new(),
            academic_year: Some("2025-2026".to_string()),
            semester: Some("Spring".to_string()),
            start_time: "09:00".to_string(),
            slot_duration_minutes: 60,
            slots_per_day: 6,
            break_after_slot: 3,
            break_duration_minutes: 15,
            working_days: default_working_days(),
        }
    }
}

impl ScheduleSettings {
    /// Settings with the given grid parameters and default metadata.
    pub fn new(
        start_time: impl Into<String>,
        slot_duration_minutes: u32,
        slots_per_day: u32,
        break_after_slot: u32,
        break_duration_minutes: u32,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            slot_duration_minutes,
            slots_per_day,
            break_after_slot,
            break_duration_minutes,
            ..Default::default()
        }
    }

    /// Replace the working days.
    pub fn with_working_days<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.working_days = days.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a break gap is inserted between two labeled slots.
    pub fn has_break(&self) -> bool {
        self.break_after_slot > 0 && self.break_after_slot < self.slots_per_day
    }

    pub fn is_working_day(&self, day: &str) -> bool {
        self.working_days.iter().any(|d| d == day)
    }
}
