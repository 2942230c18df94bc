//! Multi-section fixed-header table composition.
//!
//! Several dense tables (typically detector list and hardware list) are
//! stacked under one shared column header. The result is split into the four
//! synchronized parts a fixed-header table view draws:
//!
//! ```text
//! +--------+----------------------+
//! | corner | column header        |
//! +--------+----------------------+
//! | row    | body                 |
//! | header | (scrolls both ways)  |
//! +--------+----------------------+
//! ```
//!
//! Column 0 of every source row goes to the left side (corner / row header),
//! columns `1..` to the right side. Only the first section's header rows are
//! used; the sections are assumed to share column semantics.

use serde::Serialize;
use std::collections::BTreeMap;

use tracing::debug;

use crate::densify::NOT_IN_USE;
use crate::error::{ProtogridError, Result};
use crate::toggle::{CellKey, CellState, CellStates, Transition};
use crate::types::{UiTable, UiTableSection};

use super::{LayoutMetrics, TableGeometry, TextMeasure, WidthResolver};

/// Visual role of a composed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CellStyle {
    Header,
    Corner,
    RowHeader,
    SectionTitle,
    /// Plain body cell
    Body,
    /// Body cell showing its placeholder in muted text
    Placeholder,
    /// Body cell with a value
    Selected,
    /// Body cell the installation does not use
    NotInUse,
    Gap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCell {
    pub text: String,
    /// Width in pixels
    pub width: u32,
    pub style: CellStyle,
    /// Set for interactive body cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<CellKey>,
}

impl LayoutCell {
    fn new(text: impl Into<String>, width: u32, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            width,
            style,
            key: None,
        }
    }
}

/// What a body/row-header row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RowKind {
    /// Column header / corner row
    Header { row: usize },
    SectionTitle { section: usize },
    Data { section: usize, row: usize },
    Gap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRow {
    pub kind: RowKind,
    /// Minimum height in pixels
    pub height: u32,
    pub cells: Vec<LayoutCell>,
}

/// A composed fixed-header table.
///
/// `body` and `row_header` have the same number of rows, as do
/// `column_header` and `corner`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTable {
    pub total_cols: usize,
    /// Pixel width per column, column 0 = row header
    pub col_widths: Vec<u32>,
    pub body: Vec<LayoutRow>,
    pub column_header: Vec<LayoutRow>,
    pub row_header: Vec<LayoutRow>,
    pub corner: Vec<LayoutRow>,
    pub geometry: TableGeometry,
    #[serde(skip)]
    cell_states: CellStates,
    /// Interactive key to (body row, body cell) index
    #[serde(skip)]
    positions: BTreeMap<CellKey, (usize, usize)>,
}

impl LayoutTable {
    pub fn cell_states(&self) -> &CellStates {
        &self.cell_states
    }

    /// Body cell by key, if the key is interactive.
    pub fn body_cell(&self, key: &CellKey) -> Option<&LayoutCell> {
        let &(row, cell) = self.positions.get(key)?;
        self.body.get(row)?.cells.get(cell)
    }

    /// Interactive key under a point in body coordinates: `(0, 0)` is the
    /// top-left corner of body column 1 in the first body row.
    pub fn body_key_at(&self, x: f32, y: f32) -> Option<CellKey> {
        if x < 0.0 {
            return None;
        }
        let row = usize::try_from(self.geometry.row_at_y(y)?).ok()?;
        let table_x = x + self.geometry.row_header_width();
        let col = usize::try_from(self.geometry.col_at_x(table_x)?).ok()?;
        // body cells start at column 1
        let cell = col.checked_sub(1)?;
        self.body.get(row)?.cells.get(cell)?.key
    }

    /// Toggle an interactive cell with the selected `fill` marker and update
    /// its displayed text and style. `None` if the key is not interactive.
    pub fn activate(&mut self, key: &CellKey, fill: &str) -> Option<Transition> {
        let &(row, cell) = self.positions.get(key)?;
        let transition = self.cell_states.activate(key, fill)?;
        let target = self.body.get_mut(row)?.cells.get_mut(cell)?;
        match &transition {
            Transition::Filled(value) => {
                target.text.clone_from(value);
                target.style = CellStyle::Selected;
            }
            Transition::Cleared(placeholder) => {
                target.text.clone_from(placeholder);
                target.style = if placeholder.trim().is_empty() {
                    CellStyle::Body
                } else {
                    CellStyle::Placeholder
                };
            }
            Transition::Unchanged => {}
        }
        Some(transition)
    }
}

/// Composes sections into a [`LayoutTable`].
pub struct TableCompositor<'a, M: TextMeasure + ?Sized> {
    metrics: LayoutMetrics,
    measure: &'a M,
}

impl<'a, M: TextMeasure + ?Sized> TableCompositor<'a, M> {
    pub fn new(metrics: LayoutMetrics, measure: &'a M) -> Self {
        Self { metrics, measure }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Compose one or more sections. Fails on an empty section list.
    pub fn compose(&self, sections: &[UiTableSection]) -> Result<LayoutTable> {
        let total_cols = sections
            .iter()
            .flat_map(|s| s.table.header.iter().chain(&s.table.rows))
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(1);

        let padded: Vec<UiTableSection> = sections
            .iter()
            .map(|s| UiTableSection {
                title: s.title.clone(),
                table: pad_table(&s.table, total_cols),
            })
            .collect();

        let tables: Vec<&UiTable> = padded.iter().map(|s| &s.table).collect();
        let Some(first_table) = tables.first().copied() else {
            return Err(ProtogridError::InvalidArgument(
                "sections must not be empty".to_string(),
            ));
        };
        let col_widths = WidthResolver::new(&self.metrics, self.measure).resolve(&tables, total_cols);
        let width_of = |c: usize| col_widths.get(c).copied().unwrap_or(self.metrics.min_empty_col);
        let row_height = self.metrics.row_height;

        // Column header and corner from the first section only
        let mut column_header = Vec::with_capacity(first_table.header.len());
        let mut corner = Vec::with_capacity(first_table.header.len());
        for (header_idx, header_row) in first_table.header.iter().enumerate() {
            let kind = RowKind::Header { row: header_idx };
            column_header.push(LayoutRow {
                kind,
                height: row_height,
                cells: header_row
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(c, text)| LayoutCell::new(text.as_str(), width_of(c), CellStyle::Header))
                    .collect(),
            });
            corner.push(LayoutRow {
                kind,
                height: row_height,
                cells: vec![LayoutCell::new(
                    header_row.first().map_or("", String::as_str),
                    width_of(0),
                    CellStyle::Corner,
                )],
            });
        }

        let mut body: Vec<LayoutRow> = Vec::new();
        let mut row_header: Vec<LayoutRow> = Vec::new();
        let mut cell_states = CellStates::new();
        let mut positions = BTreeMap::new();
        let last_section = padded.len().saturating_sub(1);

        for (section_idx, section) in padded.iter().enumerate() {
            if let Some(title) = &section.title {
                let kind = RowKind::SectionTitle {
                    section: section_idx,
                };
                row_header.push(LayoutRow {
                    kind,
                    height: row_height,
                    cells: vec![LayoutCell::new(title.as_str(), width_of(0), CellStyle::SectionTitle)],
                });
                body.push(LayoutRow {
                    kind,
                    height: row_height,
                    cells: (1..total_cols)
                        .map(|c| {
                            let text = if c == 1 { title.as_str() } else { "" };
                            LayoutCell::new(text, width_of(c), CellStyle::SectionTitle)
                        })
                        .collect(),
                });
            }

            for (row_idx, values) in section.table.rows.iter().enumerate() {
                let kind = RowKind::Data {
                    section: section_idx,
                    row: row_idx,
                };
                row_header.push(LayoutRow {
                    kind,
                    height: row_height,
                    cells: vec![LayoutCell::new(
                        values.first().map_or("", String::as_str),
                        width_of(0),
                        CellStyle::RowHeader,
                    )],
                });

                let body_row = body.len();
                let mut cells = Vec::with_capacity(total_cols.saturating_sub(1));
                for (c, value) in values.iter().enumerate().skip(1) {
                    let key = CellKey::new(section_idx, row_idx, c);
                    let (cell, state) =
                        body_cell(value, section.table.cell_type(row_idx, c), width_of(c), key);
                    if let Some(state) = state {
                        positions.insert(key, (body_row, cells.len()));
                        cell_states.insert(key, state);
                    }
                    cells.push(cell);
                }
                body.push(LayoutRow {
                    kind,
                    height: row_height,
                    cells,
                });
            }

            if section_idx < last_section {
                let gap = self.metrics.gap_height;
                row_header.push(LayoutRow {
                    kind: RowKind::Gap,
                    height: gap,
                    cells: vec![LayoutCell::new("", width_of(0), CellStyle::Gap)],
                });
                body.push(LayoutRow {
                    kind: RowKind::Gap,
                    height: gap,
                    cells: (1..total_cols)
                        .map(|c| LayoutCell::new("", width_of(c), CellStyle::Gap))
                        .collect(),
                });
            }
        }

        let row_heights: Vec<u32> = body.iter().map(|r| r.height).collect();
        let header_rows = u32::try_from(column_header.len()).unwrap_or(u32::MAX);
        let geometry = TableGeometry::new(
            &col_widths,
            &row_heights,
            header_rows,
            row_height,
            &first_table.spans,
        );

        debug!(
            sections = padded.len(),
            total_cols,
            body_rows = body.len(),
            header_rows,
            interactive = cell_states.len(),
            "composed table layout"
        );

        Ok(LayoutTable {
            total_cols,
            col_widths,
            body,
            column_header,
            row_header,
            corner,
            geometry,
            cell_states,
            positions,
        })
    }
}

/// Right-pad every header and body row (and the type rows) to `total_cols`.
pub fn pad_table(table: &UiTable, total_cols: usize) -> UiTable {
    let pad = |row: &Vec<String>| {
        let mut row = row.clone();
        if row.len() < total_cols {
            row.resize(total_cols, String::new());
        }
        row
    };
    UiTable {
        header: table.header.iter().map(pad).collect(),
        rows: table.rows.iter().map(pad).collect(),
        cell_types: table.cell_types.as_ref().map(|types| {
            types
                .iter()
                .map(|row| {
                    let mut row = row.clone();
                    if row.len() < total_cols {
                        row.resize(total_cols, None);
                    }
                    row
                })
                .collect()
        }),
        ..table.clone()
    }
}

/// Presentation of one body cell plus its toggle state, if interactive.
fn body_cell(
    value: &str,
    cell_type: Option<&str>,
    width: u32,
    key: CellKey,
) -> (LayoutCell, Option<CellState>) {
    let not_in_use = cell_type.is_some_and(|t| t.eq_ignore_ascii_case(NOT_IN_USE));
    let placeholder = match cell_type {
        Some(t) if !not_in_use && !t.trim().is_empty() => t,
        _ => "",
    };
    let interactive = !placeholder.is_empty();
    let has_value = !value.trim().is_empty();

    let text = if has_value { value } else { placeholder };
    let style = if not_in_use {
        CellStyle::NotInUse
    } else if has_value {
        CellStyle::Selected
    } else if interactive {
        CellStyle::Placeholder
    } else {
        CellStyle::Body
    };

    let mut cell = LayoutCell::new(text, width, style);
    let state = interactive.then(|| {
        cell.key = Some(key);
        CellState::new(placeholder, has_value)
    });
    (cell, state)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::layout::MonospaceMeasure;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| (*s).to_string()).collect()
    }

    fn table(header: &[&[&str]], rows: &[&[&str]]) -> UiTable {
        UiTable {
            header: header.iter().map(|r| strings(r)).collect(),
            rows: rows.iter().map(|r| strings(r)).collect(),
            ..UiTable::default()
        }
    }

    fn compose(sections: &[UiTableSection]) -> Result<LayoutTable> {
        let measure = MonospaceMeasure::new(10.0);
        TableCompositor::new(LayoutMetrics::default(), &measure).compose(sections)
    }

    fn texts(row: &LayoutRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_sections_rejected() {
        assert!(matches!(
            compose(&[]),
            Err(ProtogridError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_section_split() {
        let t = table(&[&["Nr", "Typ", "Q1"]], &[&["1", "OM", "x"], &["2", "HM"]]);
        let layout = compose(&[UiTableSection::new(t)]).unwrap();

        assert_eq!(layout.total_cols, 3);
        assert_eq!(layout.corner.len(), 1);
        assert_eq!(layout.corner[0].cells[0].text, "Nr");
        assert_eq!(texts(&layout.column_header[0]), vec!["Typ", "Q1"]);
        assert_eq!(layout.body.len(), 2);
        assert_eq!(layout.row_header.len(), 2);
        assert_eq!(texts(&layout.body[0]), vec!["OM", "x"]);
        // short row padded
        assert_eq!(texts(&layout.body[1]), vec!["HM", ""]);
        assert!(layout.body.iter().all(|r| r.kind != RowKind::Gap));
    }

    #[test]
    fn test_titles_and_gaps() {
        let a = table(&[&["Nr", "A", "B"]], &[&["1", "a", "b"]]);
        let b = table(&[&["ignored"]], &[&["H1", "h"], &["H2", "i"]]);
        let layout = compose(&[
            UiTableSection::titled("Melder", a),
            UiTableSection::titled("Hardware", b),
        ])
        .unwrap();

        // title, data, gap, title, data, data
        assert_eq!(layout.body.len(), 6);
        assert_eq!(layout.row_header.len(), 6);
        assert_eq!(layout.row_header[0].cells[0].text, "Melder");
        assert_eq!(texts(&layout.body[0]), vec!["Melder", ""]);
        assert_eq!(layout.body[2].kind, RowKind::Gap);
        assert_eq!(layout.body[2].height, 8);
        assert_eq!(layout.row_header[3].cells[0].text, "Hardware");
        assert_eq!(layout.row_header[4].cells[0].text, "H1");
        assert_eq!(texts(&layout.body[5]), vec!["i", ""]);
        assert_eq!(layout.corner.len(), 1);
        assert_eq!(layout.corner[0].cells[0].text, "Nr");
        assert_eq!(layout.geometry.total_height(), 40.0 * 5.0 + 8.0);
    }

    #[test]
    fn test_widths_shared_across_sections() {
        let mut a = table(&[&["Nr", "A"]], &[&["1", "a"]]);
        a.column_widths = Some(vec![Some(4)]);
        let b = table(&[], &[&["1", "a much longer value"]]);
        let layout = compose(&[UiTableSection::new(a), UiTableSection::new(b)]).unwrap();

        assert_eq!(layout.col_widths[0], 56);
        assert_eq!(layout.col_widths[1], 190 + 16);
        for row in &layout.body {
            for cell in &row.cells {
                assert_eq!(cell.width, layout.col_widths[1]);
            }
        }
    }

    #[test]
    fn test_body_cell_presentation() {
        let mut t = table(&[&["Nr", "a", "b", "c", "d"]], &[&["1", "", "Q3", "", ""]]);
        t.cell_types = Some(vec![vec![
            None,
            Some("Q1".into()),
            Some("Q1".into()),
            Some("notinuse".into()),
            None,
        ]]);
        let layout = compose(&[UiTableSection::new(t)]).unwrap();
        let cells = &layout.body[0].cells;

        assert_eq!(cells[0].text, "Q1");
        assert_eq!(cells[0].style, CellStyle::Placeholder);
        assert_eq!(cells[1].text, "Q3");
        assert_eq!(cells[1].style, CellStyle::Selected);
        assert_eq!(cells[2].style, CellStyle::NotInUse);
        assert_eq!(cells[2].key, None);
        assert_eq!(cells[3].style, CellStyle::Body);
        assert_eq!(layout.cell_states().len(), 2);
        assert!(layout.cell_states().get(&CellKey::new(0, 0, 2)).unwrap().filled);
    }

    #[test]
    fn test_activate_updates_cell() {
        let mut t = table(&[&["Nr", "a"]], &[&["1", ""]]);
        t.cell_types = Some(vec![vec![None, Some("P".into())]]);
        let mut layout = compose(&[UiTableSection::new(t)]).unwrap();
        let key = CellKey::new(0, 0, 1);

        assert_eq!(layout.activate(&key, "Q2"), Some(Transition::Filled("Q2".into())));
        let cell = layout.body_cell(&key).unwrap();
        assert_eq!(cell.text, "Q2");
        assert_eq!(cell.style, CellStyle::Selected);

        assert_eq!(layout.activate(&key, "Q2"), Some(Transition::Cleared("P".into())));
        let cell = layout.body_cell(&key).unwrap();
        assert_eq!(cell.text, "P");
        assert_eq!(cell.style, CellStyle::Placeholder);

        assert_eq!(layout.activate(&CellKey::new(0, 0, 0), "Q2"), None);
    }

    #[test]
    fn test_body_key_at() {
        let mut t = table(&[&["Nr", "a", "b"]], &[&["1", "", ""], &["2", "", ""]]);
        t.column_widths = Some(vec![Some(2), Some(2), Some(2)]);
        t.cell_types = Some(vec![vec![None, None, None], vec![None, None, Some("P".into())]]);
        let layout = compose(&[UiTableSection::new(t)]).unwrap();

        // columns are 36px wide, rows 40px high; x starts at body column 1
        assert_eq!(layout.body_key_at(44.0, 50.0), Some(CellKey::new(0, 1, 2)));
        assert_eq!(layout.body_key_at(4.0, 50.0), None);
        assert_eq!(layout.body_key_at(-4.0, 50.0), None);
        assert_eq!(layout.body_key_at(44.0, 500.0), None);
        assert_eq!(layout.body_key_at(80.0, 50.0), None);
    }

    #[test]
    fn test_body_key_at_first_body_column() {
        let mut t = table(&[&["Nr", "a"]], &[&["1", ""]]);
        t.column_widths = Some(vec![Some(4), Some(2)]);
        t.cell_types = Some(vec![vec![None, Some("Q1".into())]]);
        let layout = compose(&[UiTableSection::new(t)]).unwrap();

        // row header is 56px wide but not part of the body frame
        assert_eq!(layout.body_key_at(5.0, 5.0), Some(CellKey::new(0, 0, 1)));
        assert_eq!(layout.body_key_at(35.0, 39.0), Some(CellKey::new(0, 0, 1)));
        assert_eq!(layout.body_key_at(60.0, 5.0), None);
        let rect = layout.geometry.cell_rect(0, 1);
        assert_eq!((rect.x, rect.width), (0.0, 36.0));
    }

    #[test]
    fn test_header_spans_from_first_section() {
        let mut t = table(&[&["Nr", "Quartal", ""], &["", "Q1", "Q2"]], &[]);
        t.spans = vec![crate::types::Span {
            row_start: 0,
            col_start: 1,
            row_end: 0,
            col_end: 2,
            label: "Quartal".into(),
        }];
        let layout = compose(&[UiTableSection::new(t)]).unwrap();
        assert_eq!(layout.column_header.len(), 2);
        assert_eq!(layout.corner.len(), 2);
        assert!(layout.geometry.header_cell_rect(0, 2).skip);
        assert!(layout.body.is_empty());
    }
}
