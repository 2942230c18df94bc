//! Test fixtures for building protocol envelopes as JSON.
//!
//! The builders produce wire JSON (not the Rust structs) so the tests also
//! exercise envelope decoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{EnvelopeBuilder, TableBuilder};
//!
//! let json = EnvelopeBuilder::new("BMA")
//!     .installation("Haupthaus", Some(TableBuilder::new(2, 3).cell(0, 0, "1")), None)
//!     .build();
//! let envelope = protogrid::Envelope::from_json(&json).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use serde_json::{json, Value};

// ============================================================================
// Table Builder
// ============================================================================

/// Builds the JSON of one wire table (`head`, `grid`, `itemsEditable`).
#[derive(Clone)]
pub struct TableBuilder {
    rows: i64,
    cols: i64,
    header: Vec<Vec<String>>,
    spans: Vec<Value>,
    cells: Vec<Value>,
    editable: Vec<(String, String)>,
    q_start: Option<i64>,
    widths: Option<Vec<Value>>,
    items_editable: bool,
}

impl TableBuilder {
    pub fn new(rows: i64, cols: i64) -> Self {
        Self {
            rows,
            cols,
            header: Vec::new(),
            spans: Vec::new(),
            cells: Vec::new(),
            editable: Vec::new(),
            q_start: None,
            widths: None,
            items_editable: false,
        }
    }

    pub fn header_row(mut self, labels: &[&str]) -> Self {
        self.header
            .push(labels.iter().map(|s| (*s).to_string()).collect());
        self
    }

    pub fn span(mut self, r0: i32, c0: i32, r1: i32, c1: i32, label: &str) -> Self {
        self.spans
            .push(json!({"r0": r0, "c0": c0, "r1": r1, "c1": c1, "label": label}));
        self
    }

    /// Cell with a value and no type hint.
    pub fn cell(self, r: i64, c: i64, v: impl Into<Value>) -> Self {
        self.raw_cell(json!({"r": r, "c": c, "v": v.into()}))
    }

    /// Cell with a value and a type/placeholder hint.
    pub fn typed_cell(self, r: i64, c: i64, v: impl Into<Value>, t: impl Into<Value>) -> Self {
        self.raw_cell(json!({"r": r, "c": c, "v": v.into(), "t": t.into()}))
    }

    pub fn raw_cell(mut self, cell: Value) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn editable(mut self, col: &str, kind: &str) -> Self {
        self.editable.push((col.to_string(), kind.to_string()));
        self
    }

    pub fn quarter_start(mut self, col: i64) -> Self {
        self.q_start = Some(col);
        self
    }

    pub fn widths(mut self, widths: &[Option<i64>]) -> Self {
        self.widths = Some(widths.iter().map(|w| json!(w)).collect());
        self
    }

    pub fn items_editable(mut self) -> Self {
        self.items_editable = true;
        self
    }

    pub fn to_json(&self) -> Value {
        // group cells by row the way the producer does
        let mut by_row: Vec<Vec<Value>> = Vec::new();
        for cell in &self.cells {
            let r = usize::try_from(cell["r"].as_i64().unwrap_or(0)).unwrap_or(0);
            if by_row.len() <= r {
                by_row.resize(r + 1, Vec::new());
            }
            by_row[r].push(cell.clone());
        }

        let mut grid = json!({
            "nRows": self.rows,
            "nCols": self.cols,
            "body": by_row,
            "columnsEditable": self
                .editable
                .iter()
                .map(|(col, kind)| (col.clone(), Value::String(kind.clone())))
                .collect::<serde_json::Map<String, Value>>(),
        });
        if let Some(q) = self.q_start {
            grid["qStartCol"] = json!(q);
        }
        if let Some(w) = &self.widths {
            grid["colWidths"] = json!(w);
        }

        let mut table = json!({"grid": grid, "itemsEditable": self.items_editable});
        if !self.header.is_empty() || !self.spans.is_empty() {
            table["head"] = json!({"rows": self.header, "spans": self.spans});
        }
        table
    }
}

// ============================================================================
// Envelope Builder
// ============================================================================

pub struct EnvelopeBuilder {
    p_type: String,
    contract: String,
    customer: String,
    detector_types: Vec<String>,
    installations: Vec<Value>,
}

impl EnvelopeBuilder {
    pub fn new(p_type: &str) -> Self {
        Self {
            p_type: p_type.to_string(),
            contract: "VN-0001".to_string(),
            customer: "Muster GmbH".to_string(),
            detector_types: vec!["OM".into(), "HM".into(), "WM".into()],
            installations: Vec::new(),
        }
    }

    pub fn contract(mut self, contract: &str) -> Self {
        self.contract = contract.to_string();
        self
    }

    pub fn installation(
        mut self,
        name: &str,
        detector: Option<TableBuilder>,
        hardware: Option<TableBuilder>,
    ) -> Self {
        let mut inst = json!({"name": name});
        if let Some(t) = detector {
            inst["melder"] = t.to_json();
        }
        if let Some(t) = hardware {
            inst["hardware"] = t.to_json();
        }
        self.installations.push(inst);
        self
    }

    pub fn to_value(&self) -> Value {
        json!({
            "Meta": {
                "pType": self.p_type,
                "wType": "4Q",
                "VNnr": self.contract,
                "Kunde": self.customer,
            },
            "Protokoll": {
                "melderTypes": self.detector_types,
                "anlagen": self.installations,
                "editedBy": {"name": "Prüfer", "ts": "2025-09-12T10:11:12Z"},
            }
        })
    }

    pub fn build(&self) -> String {
        self.to_value().to_string()
    }

    pub fn envelope(&self) -> protogrid::Envelope {
        protogrid::Envelope::from_json(&self.build()).expect("fixture envelope decodes")
    }
}

// ============================================================================
// Canned protocols
// ============================================================================

/// A BMA detector list with a two-row header, quarter columns 3..=6 and
/// placeholders in the quarter cells.
pub fn bma_detector_table() -> TableBuilder {
    TableBuilder::new(3, 7)
        .header_row(&["Gr.", "Nr", "Typ", "Quartal", "", "", ""])
        .header_row(&["", "", "", "Q1", "Q2", "Q3", "Q4"])
        .span(0, 3, 0, 6, "Quartal")
        .cell(0, 0, "1")
        .cell(0, 1, "1")
        .cell(0, 2, "OM")
        .typed_cell(0, 3, "Q1", "Q1")
        .typed_cell(0, 4, Value::Null, "Q2")
        .cell(1, 0, "1")
        .cell(1, 1, 2)
        .cell(1, 2, "HM")
        .typed_cell(1, 3, Value::Null, "Q1")
        .cell(2, 0, "2")
        .cell(2, 1, 1)
        .editable("2", "")
        .editable("3", "quarter")
        .quarter_start(3)
        .items_editable()
}

pub fn hardware_table() -> TableBuilder {
    TableBuilder::new(2, 4)
        .header_row(&["Pos", "Bezeichnung", "i.O.", "Bem."])
        .cell(0, 0, "1")
        .cell(0, 1, "Zentrale")
        .typed_cell(0, 2, Value::Null, "ja")
        .cell(1, 0, "2")
        .cell(1, 1, "Akku")
        .editable("3", "")
}
