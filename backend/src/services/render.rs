//! Grid rendering for UI and API consumers.
//!
//! The slot axis is always recomputed from the settings passed in, never
//! taken from a cached grid, so a timetable renders the same way everywhere
//! after its settings change.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::entry_index::{CellConflict, EntryIndex, OrphanedEntryWarning};
use super::slot_grid::{compute_slots, GridError};
use crate::models::{Directory, Entry, ScheduleSettings};

/// Canonical rendered timetable.
///
/// `cells[day][slot]` is `null` for an empty cell. Conflicts and orphans are
/// reported alongside so nothing in the entry list is silently hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedGrid {
    pub days: Vec<String>,
    pub slots: Vec<String>,
    pub cells: HashMap<String, HashMap<String, Option<Entry>>>,
    pub conflicts: Vec<CellConflict>,
    pub orphans: Vec<OrphanedEntryWarning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_faculty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_rooms: Vec<String>,
}

impl RenderedGrid {
    pub fn cell(&self, day: &str, slot: &str) -> Option<&Entry> {
        self.cells.get(day)?.get(slot)?.as_ref()
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.orphans.is_empty()
    }
}

/// Render `entries` on the grid derived from `settings`.
pub fn render_grid(
    entries: &[Entry],
    settings: &ScheduleSettings,
    directory: &Directory,
) -> Result<RenderedGrid, GridError> {
    let slots = compute_slots(settings)?;
    let days = settings.working_days.clone();
    let index = EntryIndex::build(entries, &slots, &days);

    let cells = days
        .iter()
        .map(|day| {
            let row = slots
                .iter()
                .map(|slot| (slot.clone(), index.get(day, slot).cloned()))
                .collect();
            (day.clone(), row)
        })
        .collect();

    let conflicts = index.conflicts();
    for conflict in &conflicts {
        warn!(
            "{} entries share {} {}",
            conflict.entries.len(),
            conflict.day,
            conflict.slot
        );
    }
    let orphans = index.orphans().to_vec();
    for orphan in &orphans {
        warn!("Orphaned entry: {}", orphan);
    }

    let mut unknown_faculty: Vec<String> = entries
        .iter()
        .filter(|e| !directory.knows_faculty(&e.faculty))
        .map(|e| e.faculty.clone())
        .collect();
    unknown_faculty.sort();
    unknown_faculty.dedup();

    let mut unknown_rooms: Vec<String> = entries
        .iter()
        .filter_map(|e| e.room.as_ref())
        .filter(|room| !directory.knows_room(room))
        .cloned()
        .collect();
    unknown_rooms.sort();
    unknown_rooms.dedup();

    Ok(RenderedGrid {
        days,
        slots,
        cells,
        conflicts,
        orphans,
        unknown_faculty,
        unknown_rooms,
    })
}
