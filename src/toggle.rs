//! Quarter-marker toggle for editable body cells.
//!
//! An interactive cell is either empty (showing its placeholder, if any) or
//! filled with the marker that was selected when the user tapped it. Tapping
//! a filled cell clears it again. Cells without a placeholder type never
//! become interactive and have no state here.

use serde::Serialize;
use std::collections::BTreeMap;

/// Address of a body cell inside a composed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellKey {
    /// Index of the section the cell came from
    pub section: usize,
    /// Data row within that section
    pub row: usize,
    /// Column within the section's rows (1.. for body cells)
    pub col: usize,
}

impl CellKey {
    pub fn new(section: usize, row: usize, col: usize) -> Self {
        Self { section, row, col }
    }
}

/// State of one interactive cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellState {
    pub placeholder: String,
    pub filled: bool,
}

/// Outcome of an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Empty → Filled; the cell now shows this value.
    Filled(String),
    /// Filled → Empty; the cell now shows its placeholder (possibly blank).
    Cleared(String),
    /// Empty cell activated without a usable fill value.
    Unchanged,
}

impl CellState {
    pub fn new(placeholder: impl Into<String>, filled: bool) -> Self {
        Self {
            placeholder: placeholder.into(),
            filled,
        }
    }

    /// Apply the activate signal with the externally selected `fill` value.
    pub fn activate(&mut self, fill: &str) -> Transition {
        if self.filled {
            self.filled = false;
            return Transition::Cleared(self.placeholder.clone());
        }
        if fill.trim().is_empty() {
            return Transition::Unchanged;
        }
        self.filled = true;
        Transition::Filled(fill.to_string())
    }
}

/// All interactive cells of one composed layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStates {
    states: BTreeMap<CellKey, CellState>,
}

impl CellStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CellKey, state: CellState) {
        self.states.insert(key, state);
    }

    pub fn get(&self, key: &CellKey) -> Option<&CellState> {
        self.states.get(key)
    }

    pub fn is_interactive(&self, key: &CellKey) -> bool {
        self.states.contains_key(key)
    }

    /// Activate a cell; `None` when the key is not interactive.
    pub fn activate(&mut self, key: &CellKey, fill: &str) -> Option<Transition> {
        self.states.get_mut(key).map(|state| state.activate(fill))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &CellState)> {
        self.states.iter()
    }
}
