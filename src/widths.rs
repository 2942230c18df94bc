//! Fixed column widths per installation type.
//!
//! Widths are character counts, converted to pixels only at layout time.
//! Columns without an explicit override take the definition's default.

use std::collections::HashMap;

use crate::types::TableKind;

/// Width rule for one table kind of one installation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWidthDefinition {
    pub default_chars: i32,
    pub overrides: HashMap<usize, i32>,
}

impl TableWidthDefinition {
    pub fn new(default_chars: i32, overrides: &[(usize, i32)]) -> Self {
        Self {
            default_chars,
            overrides: overrides.iter().copied().collect(),
        }
    }

    /// Expand the rule to exactly `col_count` widths.
    pub fn to_width_list(&self, col_count: usize) -> Vec<i32> {
        (0..col_count)
            .map(|idx| {
                self.overrides
                    .get(&idx)
                    .copied()
                    .unwrap_or(self.default_chars)
            })
            .collect()
    }
}

/// Registry of width rules, keyed by case-insensitive installation type.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidthRegistry {
    detector: HashMap<String, TableWidthDefinition>,
    hardware: HashMap<String, TableWidthDefinition>,
}

impl ColumnWidthRegistry {
    /// Empty registry; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the rules for BMA, EMA, ELA, RWA and LR.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(
            TableKind::Detector,
            "BMA",
            TableWidthDefinition::new(2, &[(0, 4), (1, 2), (2, 6)]),
        );
        for p_type in ["EMA", "ELA", "RWA", "LR"] {
            registry.register(
                TableKind::Detector,
                p_type,
                TableWidthDefinition::new(3, &[(0, 5), (1, 3), (2, 6)]),
            );
        }
        for p_type in ["BMA", "EMA", "ELA", "RWA", "LR"] {
            registry.register(
                TableKind::Hardware,
                p_type,
                TableWidthDefinition::new(3, &[(0, 6), (1, 4)]),
            );
        }

        registry
    }

    /// Add or replace a rule. Returns the rule previously registered under
    /// the same (case-insensitive) installation type, if any.
    pub fn register(
        &mut self,
        kind: TableKind,
        installation_type: &str,
        definition: TableWidthDefinition,
    ) -> Option<TableWidthDefinition> {
        self.table_mut(kind)
            .insert(installation_type.to_ascii_uppercase(), definition)
    }

    /// Width hints for `col_count` columns, or `None` for an unknown type.
    pub fn widths_for(
        &self,
        kind: TableKind,
        installation_type: &str,
        col_count: usize,
    ) -> Option<Vec<i32>> {
        self.table(kind)
            .get(&installation_type.to_ascii_uppercase())
            .map(|def| def.to_width_list(col_count))
    }

    /// Same as [`widths_for`](Self::widths_for), shaped as per-column optional hints.
    pub fn hints_for(
        &self,
        kind: TableKind,
        installation_type: &str,
        col_count: usize,
    ) -> Option<Vec<Option<i32>>> {
        self.widths_for(kind, installation_type, col_count)
            .map(|widths| widths.into_iter().map(Some).collect())
    }

    fn table(&self, kind: TableKind) -> &HashMap<String, TableWidthDefinition> {
        match kind {
            TableKind::Detector => &self.detector,
            TableKind::Hardware => &self.hardware,
        }
    }

    fn table_mut(&mut self, kind: TableKind) -> &mut HashMap<String, TableWidthDefinition> {
        match kind {
            TableKind::Detector => &mut self.detector,
            TableKind::Hardware => &mut self.hardware,
        }
    }
}
