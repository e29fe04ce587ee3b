//! Slot grid computation.
//!
//! Turns a `ScheduleSettings` value into the ordered list of slot labels for
//! one day. Labels are content-based (`"9:00AM-10:00AM"`) because entries
//! reference slots by label, so the same settings must always yield the same
//! sequence.
//!
//! A break is a gap between two labeled slots and never gets a label of its
//! own. A day may end exactly at midnight (the last label ends in
//! `12:00AM`) but may not run past it: such settings are rejected instead of
//! producing labels that wrap onto the start of the day.

use chrono::{NaiveTime, Timelike, Weekday};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::ScheduleSettings;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Invalid settings. Fatal to slot computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("slotsPerDay must be at least 1 (got {0})")]
    NoSlots(u32),

    #[error("slotDurationMinutes must be positive")]
    ZeroDuration,

    #[error("startTime '{0}' is not a valid HH:MM time")]
    MalformedStartTime(String),

    #[error("schedule ends at minute {end_minute}, past midnight")]
    DayOverflow { end_minute: u32 },

    #[error("breakAfterSlot {break_after} must be below slotsPerDay {slots_per_day}")]
    BreakOutOfRange { break_after: u32, slots_per_day: u32 },

    #[error("'{0}' is not a weekday name")]
    UnknownWeekday(String),

    #[error("working day '{0}' is listed more than once")]
    DuplicateWeekday(String),

    #[error("at least one working day is required")]
    NoWorkingDays,
}

/// One labeled interval of the day, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpan {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl SlotSpan {
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            format_clock(self.start_minute),
            format_clock(self.end_minute)
        )
    }
}

/// Parse a `HH:MM` start time into minutes since midnight.
pub fn parse_start_time(value: &str) -> Result<u32, GridError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|t| t.hour() * 60 + t.minute())
        .map_err(|_| GridError::MalformedStartTime(value.to_string()))
}

/// Format minutes since midnight as a 12-hour clock reading, e.g. `9:05AM`.
pub fn format_clock(minute: u32) -> String {
    let minute = minute % MINUTES_PER_DAY;
    let hour = minute / 60;
    let display_hour = match hour {
        0 => 12,
        13..=23 => hour - 12,
        h => h,
    };
    let period = if hour < 12 { "AM" } else { "PM" };
    format!("{}:{:02}{}", display_hour, minute % 60, period)
}

/// Move the clock forward, refusing to pass midnight.
fn advance(clock: u32, minutes: u32) -> Result<u32, GridError> {
    match clock.checked_add(minutes) {
        Some(end) if end <= MINUTES_PER_DAY => Ok(end),
        _ => Err(GridError::DayOverflow {
            end_minute: clock.saturating_add(minutes),
        }),
    }
}

/// Compute the spans of every slot of a day.
pub fn compute_spans(settings: &ScheduleSettings) -> Result<Vec<SlotSpan>, GridError> {
    if settings.slots_per_day < 1 {
        return Err(GridError::NoSlots(settings.slots_per_day));
    }
    if settings.slot_duration_minutes == 0 {
        return Err(GridError::ZeroDuration);
    }

    let mut clock = parse_start_time(&settings.start_time)?;
    let mut spans = Vec::with_capacity(settings.slots_per_day.min(MINUTES_PER_DAY) as usize);

    for i in 1..=settings.slots_per_day {
        let start_minute = clock;
        clock = advance(clock, settings.slot_duration_minutes)?;
        spans.push(SlotSpan {
            start_minute,
            end_minute: clock,
        });

        if i == settings.break_after_slot && i < settings.slots_per_day {
            clock = advance(clock, settings.break_duration_minutes)?;
        }
    }

    Ok(spans)
}

/// Compute the ordered slot labels for one day.
pub fn compute_slots(settings: &ScheduleSettings) -> Result<Vec<String>, GridError> {
    Ok(compute_spans(settings)?.iter().map(SlotSpan::label).collect())
}

/// Full settings check used before settings are stored.
///
/// Stricter than `compute_slots`, which tolerates a break placed after the
/// last slot and does not look at working days.
pub fn validate_settings(settings: &ScheduleSettings) -> Result<(), GridError> {
    compute_spans(settings)?;

    if settings.break_after_slot > 0 && settings.break_after_slot >= settings.slots_per_day {
        return Err(GridError::BreakOutOfRange {
            break_after: settings.break_after_slot,
            slots_per_day: settings.slots_per_day,
        });
    }

    if settings.working_days.is_empty() {
        return Err(GridError::NoWorkingDays);
    }
    let mut seen = HashSet::new();
    for day in &settings.working_days {
        let weekday: Weekday = day
            .parse()
            .map_err(|_| GridError::UnknownWeekday(day.clone()))?;
        if !seen.insert(weekday) {
            return Err(GridError::DuplicateWeekday(day.clone()));
        }
    }

    Ok(())
}
