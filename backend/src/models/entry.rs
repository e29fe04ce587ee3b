//! Scheduled class entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One class occupying a (day, slot) cell.
///
/// `slot` is a slot label produced by the grid of the settings the entry was
/// generated under; an entry is only meaningful next to those settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub subject: String,
    pub faculty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub day: String,
    pub slot: String,
}

impl Entry {
    pub fn new(
        subject: impl Into<String>,
        faculty: impl Into<String>,
        day: impl Into<String>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            faculty: faculty.into(),
            room: None,
            day: day.into(),
            slot: slot.into(),
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {} {}", self.subject, self.faculty, self.day, self.slot)?;
        if let Some(room) = &self.room {
            write!(f, " in {}", room)?;
        }
        Ok(())
    }
}
