//! Wire model of a protocol envelope.
//!
//! Plain serde structs that mirror the JSON the protocol producer emits.
//! There is no logic here beyond field access; turning an [`Envelope`] into
//! something a table can render is the job of [`crate::mapper`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CellScalar;

/// Root transport object: metadata plus protocol content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Meta", default)]
    pub meta: Meta,
    #[serde(rename = "Protokoll", default)]
    pub protocol: Protocol,
}

impl Envelope {
    /// Decode an envelope from JSON text.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the envelope back to its wire JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Installation type (BMA, EMA, ELA, RWA, LR, ...)
    #[serde(rename = "pType", default)]
    pub installation_type: String,
    /// Maintenance interval (1J, 2Q, 4Q, ...)
    #[serde(rename = "wType", default)]
    pub maintenance_type: String,
    #[serde(rename = "VNnr", default)]
    pub contract_number: String,
    #[serde(rename = "Kunde", default)]
    pub customer_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(rename = "melderTypes", default)]
    pub detector_type_catalog: Vec<String>,
    #[serde(rename = "anlagen", default)]
    pub installations: Vec<Installation>,
    #[serde(rename = "editedBy", default)]
    pub edited_by: EditedBy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditedBy {
    #[serde(default)]
    pub name: String,
    /// ISO-8601, e.g. `2025-09-12T10:11:12Z`
    #[serde(rename = "ts", default)]
    pub timestamp: String,
}

/// One inspected site with its detector list and optional hardware list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "melder", default, skip_serializing_if = "Option::is_none")]
    pub detector_table: Option<Table>,
    #[serde(rename = "hardware", default, skip_serializing_if = "Option::is_none")]
    pub hardware_table: Option<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,
    #[serde(default)]
    pub grid: Grid,
    #[serde(rename = "itemsEditable", default)]
    pub rows_editable: bool,
}

/// Multi-row table header with optional merged cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// A merged header region, inclusive on both ends. Negative bounds are
/// ignored at layout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "r0")]
    pub row_start: i32,
    #[serde(rename = "c0")]
    pub col_start: i32,
    #[serde(rename = "r1")]
    pub row_end: i32,
    #[serde(rename = "c1")]
    pub col_end: i32,
    #[serde(default)]
    pub label: String,
}

/// Sparse grid as sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(rename = "nRows", default)]
    pub row_count: i32,
    #[serde(rename = "nCols", default)]
    pub col_count: i32,
    #[serde(rename = "body", default)]
    pub body: CellBody,
    /// Column index (as a decimal string) to edit-kind tag.
    #[serde(rename = "columnsEditable", default)]
    pub editable_columns: BTreeMap<String, String>,
    /// First quarter column (0-based), if the table has quarter columns.
    #[serde(rename = "qStartCol", default, skip_serializing_if = "Option::is_none")]
    pub quarter_start_column: Option<i32>,
    /// Per-column width hints in characters.
    #[serde(rename = "colWidths", default, skip_serializing_if = "Option::is_none")]
    pub column_width_hints: Option<Vec<Option<i32>>>,
}

impl Grid {
    /// All sparse cells in wire order, regardless of how `body` was shaped.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        let (rows, flat): (&[Vec<Cell>], &[Cell]) = match &self.body {
            CellBody::Rows(rows) => (rows.as_slice(), &[]),
            CellBody::Flat(cells) => (&[], cells.as_slice()),
        };
        rows.iter().flatten().chain(flat.iter())
    }
}

/// The producer groups cells by row; hand-written fixtures often don't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellBody {
    Rows(Vec<Vec<Cell>>),
    Flat(Vec<Cell>),
}

impl Default for CellBody {
    fn default() -> Self {
        CellBody::Rows(Vec::new())
    }
}

/// One sparse cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// row (0-indexed)
    pub r: i32,
    /// col (0-indexed)
    pub c: i32,
    /// Actual/display value; in quarter columns the recorded marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<CellScalar>,
    /// Expected value / type hint; in quarter columns the planned marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<CellScalar>,
}

impl Cell {
    pub fn new(r: i32, c: i32) -> Self {
        Self {
            r,
            c,
            v: None,
            t: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, v: impl Into<CellScalar>) -> Self {
        self.v = Some(v.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, t: impl Into<CellScalar>) -> Self {
        self.t = Some(t.into());
        self
    }
}
