//! (day, slot) lookup over a sparse entry list.
//!
//! Matching is exact string equality on both the day name and the slot
//! label. An entry whose day or slot is not on the current grid is an
//! orphan: it is reported back, never dropped and never snapped to a
//! neighbouring slot. The index owns copies of everything it needs and is
//! rebuilt whenever settings or entries change.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::models::Entry;

/// Why an entry could not be placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    UnknownDay,
    UnknownSlot,
}

/// Non-fatal warning for an entry that no longer fits the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedEntryWarning {
    /// Position of the entry in the input list.
    pub position: usize,
    pub reason: OrphanReason,
    pub entry: Entry,
}

impl fmt::Display for OrphanedEntryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            OrphanReason::UnknownDay => write!(
                f,
                "entry #{} ({}) is on '{}', which is not a working day",
                self.position, self.entry.subject, self.entry.day
            ),
            OrphanReason::UnknownSlot => write!(
                f,
                "entry #{} ({}) references slot '{}', which the current settings do not produce",
                self.position, self.entry.subject, self.entry.slot
            ),
        }
    }
}

/// A cell claimed by more than one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConflict {
    pub day: String,
    pub slot: String,
    /// Every entry mapped to the cell, in input order.
    pub entries: Vec<Entry>,
}

/// Lookup from (day, slot) to the entries placed there.
#[derive(Debug, Clone)]
pub struct EntryIndex {
    days: Vec<String>,
    slots: Vec<String>,
    day_pos: HashMap<String, usize>,
    slot_pos: HashMap<String, usize>,
    // keyed by (day position, slot position) so iteration follows grid order
    cells: BTreeMap<(usize, usize), Vec<Entry>>,
    orphans: Vec<OrphanedEntryWarning>,
}

impl EntryIndex {
    /// Index `entries` against the given grid axes.
    pub fn build(entries: &[Entry], slots: &[String], days: &[String]) -> Self {
        let day_pos: HashMap<String, usize> = days
            .iter()
            .enumerate()
            .map(|(i, d)| (d.clone(), i))
            .collect();
        let slot_pos: HashMap<String, usize> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let mut cells: BTreeMap<(usize, usize), Vec<Entry>> = BTreeMap::new();
        let mut orphans = Vec::new();

        for (position, entry) in entries.iter().enumerate() {
            let Some(&d) = day_pos.get(&entry.day) else {
                orphans.push(OrphanedEntryWarning {
                    position,
                    reason: OrphanReason::UnknownDay,
                    entry: entry.clone(),
                });
                continue;
            };
            let Some(&s) = slot_pos.get(&entry.slot) else {
                orphans.push(OrphanedEntryWarning {
                    position,
                    reason: OrphanReason::UnknownSlot,
                    entry: entry.clone(),
                });
                continue;
            };
            cells.entry((d, s)).or_default().push(entry.clone());
        }

        Self {
            days: days.to_vec(),
            slots: slots.to_vec(),
            day_pos,
            slot_pos,
            cells,
            orphans,
        }
    }

    /// The entry at a cell. When a cell is contested, the first entry in
    /// input order occupies it and the cell is listed by `conflicts()`.
    pub fn get(&self, day: &str, slot: &str) -> Option<&Entry> {
        let key = (*self.day_pos.get(day)?, *self.slot_pos.get(slot)?);
        self.cells.get(&key).and_then(|entries| entries.first())
    }

    /// Every cell with more than one entry, in grid order.
    pub fn conflicts(&self) -> Vec<CellConflict> {
        self.cells
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|(&(d, s), entries)| CellConflict {
                day: self.days[d].clone(),
                slot: self.slots[s].clone(),
                entries: entries.clone(),
            })
            .collect()
    }

    pub fn orphans(&self) -> &[OrphanedEntryWarning] {
        &self.orphans
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }
}
