//! Boundary validation for timetables and generation requests.
//!
//! Every check collects all violations instead of stopping at the first one,
//! so callers can report each offending entry and field at once.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entry_index::{EntryIndex, OrphanReason};
use super::slot_grid::{compute_slots, GridError};
use crate::models::{Directory, Entry, ScheduleSettings};

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Position of the offending item in its list, if it came from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            position: None,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "[{}].{}: {}", pos, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Joins violations into one line for error messages and logs.
pub fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a set of entries cannot be stored with the given settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryValidationError {
    #[error("invalid settings: {0}")]
    Settings(#[from] GridError),

    #[error("{} invalid entries: {}", .0.len(), describe(.0))]
    Entries(Vec<FieldViolation>),
}

/// Check that every entry is complete and sits on the grid of `settings`.
pub fn validate_entries(
    entries: &[Entry],
    settings: &ScheduleSettings,
) -> Result<(), EntryValidationError> {
    let slots = compute_slots(settings)?;
    let mut violations = Vec::new();

    for (pos, entry) in entries.iter().enumerate() {
        if entry.subject.trim().is_empty() {
            violations.push(FieldViolation::new("subject", "must not be blank").at(pos));
        }
        if entry.faculty.trim().is_empty() {
            violations.push(FieldViolation::new("faculty", "must not be blank").at(pos));
        }
    }

    let index = EntryIndex::build(entries, &slots, &settings.working_days);
    for orphan in index.orphans() {
        let violation = match orphan.reason {
            OrphanReason::UnknownDay => FieldViolation::new(
                "day",
                format!("'{}' is not one of the working days", orphan.entry.day),
            ),
            OrphanReason::UnknownSlot => FieldViolation::new(
                "slot",
                format!("'{}' is not produced by these settings", orphan.entry.slot),
            ),
        };
        violations.push(violation.at(orphan.position));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        violations.sort_by_key(|v| v.position);
        Err(EntryValidationError::Entries(violations))
    }
}

/// One subject to place, as sent to the external solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequest {
    pub subject: String,
    pub faculty: String,
    pub lectures_per_week: u32,
}

/// Local checks a generation request must pass before any solver call.
pub fn validate_subjects(
    subjects: &[SubjectRequest],
    directory: &Directory,
) -> Result<(), Vec<FieldViolation>> {
    if subjects.is_empty() {
        return Err(vec![FieldViolation::new(
            "subjects",
            "at least one subject is required",
        )]);
    }

    let mut violations = Vec::new();
    for (pos, item) in subjects.iter().enumerate() {
        if item.subject.trim().is_empty() {
            violations.push(FieldViolation::new("subject", "must not be blank").at(pos));
        }
        if item.faculty.trim().is_empty() {
            violations.push(FieldViolation::new("faculty", "must not be blank").at(pos));
        } else if !directory.knows_faculty(&item.faculty) {
            violations.push(
                FieldViolation::new(
                    "faculty",
                    format!("'{}' is not in the faculty directory", item.faculty),
                )
                .at(pos),
            );
        }
        if item.lectures_per_week == 0 {
            violations.push(FieldViolation::new("lecturesPerWeek", "must be at least 1").at(pos));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
