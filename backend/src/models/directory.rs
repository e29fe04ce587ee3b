//! Read-only snapshot of the faculty and room registries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Registered faculty and room names.
///
/// An empty list means "no registry configured" and disables the
/// corresponding check rather than rejecting every name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub faculty: BTreeSet<String>,
    #[serde(default)]
    pub rooms: BTreeSet<String>,
}

impl Directory {
    pub fn knows_faculty(&self, name: &str) -> bool {
        self.faculty.is_empty() || self.faculty.contains(name)
    }

    pub fn knows_room(&self, name: &str) -> bool {
        self.rooms.is_empty() || self.rooms.contains(name)
    }
}
