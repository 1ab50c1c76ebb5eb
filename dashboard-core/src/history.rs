use std::collections::VecDeque;

use serde::Serialize;

use crate::catalog::Location;

pub const HISTORY_CAPACITY: usize = 5;

/// Most-recent-first list of selected locations, unique by region code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionHistory {
    entries: VecDeque<Location>,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `location` to the front, dropping any older entry for the same
    /// region and anything past capacity.
    pub fn push(&mut self, location: Location) {
        self.entries.retain(|existing| !existing.same_region(&location));
        self.entries.push_front(location);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }

    pub fn most_recent(&self) -> Option<&Location> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
