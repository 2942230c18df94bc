//! Render-ready protocol model produced by [`crate::mapper`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Span;

/// Which of an installation's two tables a grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableKind {
    /// Detector list (Melder)
    Detector,
    /// Supporting hardware list
    Hardware,
}

impl TableKind {
    /// Edit kind used when the wire leaves a column's tag empty or unknown.
    pub fn default_edit_kind(self) -> EditKind {
        match self {
            TableKind::Detector => EditKind::Choice,
            TableKind::Hardware => EditKind::Text,
        }
    }
}

/// How an editable column is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditKind {
    /// Free text (`string`)
    Text,
    /// Numeric input (`number`)
    Number,
    /// Checkbox (`bool`)
    Bool,
    /// Quarter marker stamp (`quarter`)
    Quarter,
    /// Pick from the detector type catalog (`choice`)
    Choice,
}

impl EditKind {
    /// Parse a wire tag. Case-insensitive; unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Some(EditKind::Text),
            "number" | "int" => Some(EditKind::Number),
            "bool" | "boolean" => Some(EditKind::Bool),
            "quarter" => Some(EditKind::Quarter),
            "choice" | "select" => Some(EditKind::Choice),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            EditKind::Text => "string",
            EditKind::Number => "number",
            EditKind::Bool => "bool",
            EditKind::Quarter => "quarter",
            EditKind::Choice => "choice",
        }
    }
}

/// A dense table ready for layout.
///
/// Column 0 of every row is the row-header label; columns `1..` are data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTable {
    pub header: Vec<Vec<String>>,
    pub spans: Vec<Span>,
    pub rows: Vec<Vec<String>>,
    /// Per-cell type/placeholder text, parallel to `rows`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_types: Option<Vec<Vec<Option<String>>>>,
    pub editable_columns: BTreeMap<usize, EditKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_start_column: Option<usize>,
    pub rows_editable: bool,
    /// Width hints in characters; `None` entries are measured from content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<Option<i32>>>,
}

impl UiTable {
    /// Widest row across header and body (at least 1).
    pub fn col_count(&self) -> usize {
        let header = self.header.iter().map(Vec::len).max().unwrap_or(0);
        let body = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        header.max(body).max(1)
    }

    pub fn is_quarter_col(&self, col: usize) -> bool {
        self.quarter_start_column.is_some_and(|start| col >= start)
    }

    pub fn is_editable_col(&self, col: usize) -> bool {
        self.editable_columns.contains_key(&col)
    }

    /// Width hint for a column, if one is set.
    pub fn width_hint(&self, col: usize) -> Option<i32> {
        self.column_widths
            .as_ref()
            .and_then(|w| w.get(col).copied().flatten())
    }

    /// Type/placeholder text at `(row, col)`, if any.
    pub fn cell_type(&self, row: usize, col: usize) -> Option<&str> {
        self.cell_types
            .as_ref()
            .and_then(|types| types.get(row))
            .and_then(|r| r.get(col))
            .and_then(|t| t.as_deref())
    }

    /// Copy of the table with different width hints.
    #[must_use]
    pub fn with_column_widths(&self, column_widths: Option<Vec<Option<i32>>>) -> Self {
        Self {
            column_widths,
            ..self.clone()
        }
    }
}

/// One sub-table inside a multi-section layout.
#[derive(Debug, Clone, PartialEq)]
pub struct UiTableSection {
    pub title: Option<String>,
    pub table: UiTable,
}

impl UiTableSection {
    pub fn new(table: UiTable) -> Self {
        Self { title: None, table }
    }

    pub fn titled(title: impl Into<String>, table: UiTable) -> Self {
        Self {
            title: Some(title.into()),
            table,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiInstallation {
    pub name: String,
    pub detector: UiTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<UiTable>,
}

/// A mapped protocol, the value handed to every layout call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConstruct {
    pub installation_type: String,
    pub maintenance_type: String,
    pub contract_number: String,
    pub customer_name: String,
    pub detector_type_catalog: Vec<String>,
    pub installations: Vec<UiInstallation>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_kind_tags() {
        assert_eq!(EditKind::from_tag("STRING"), Some(EditKind::Text));
        assert_eq!(EditKind::from_tag(" quarter "), Some(EditKind::Quarter));
        assert_eq!(EditKind::from_tag(""), None);
        assert_eq!(EditKind::from_tag("weird"), None);
        assert_eq!(EditKind::from_tag(EditKind::Choice.tag()), Some(EditKind::Choice));
    }

    #[test]
    fn test_default_edit_kinds_differ() {
        assert_eq!(TableKind::Detector.default_edit_kind(), EditKind::Choice);
        assert_eq!(TableKind::Hardware.default_edit_kind(), EditKind::Text);
    }

    #[test]
    fn test_col_count_and_hints() {
        let table = UiTable {
            header: vec![vec!["a".into(), "b".into(), "c".into()]],
            rows: vec![vec!["1".into()]],
            column_widths: Some(vec![Some(4), None]),
            quarter_start_column: Some(2),
            ..UiTable::default()
        };
        assert_eq!(table.col_count(), 3);
        assert_eq!(table.width_hint(0), Some(4));
        assert_eq!(table.width_hint(1), None);
        assert_eq!(table.width_hint(5), None);
        assert!(!table.is_quarter_col(1));
        assert!(table.is_quarter_col(2));
        assert_eq!(UiTable::default().col_count(), 1);
    }

    #[test]
    fn test_editable_columns() {
        let table = UiTable {
            editable_columns: BTreeMap::from([(1, EditKind::Text), (3, EditKind::Quarter)]),
            ..UiTable::default()
        };
        assert!(!table.is_editable_col(0));
        assert!(table.is_editable_col(1));
        assert!(!table.is_editable_col(2));
        assert!(table.is_editable_col(3));
    }
}
