//! Pixel geometry of a composed table.
//!
//! Positions are computed once when a table is composed, so hit testing is a
//! binary search over cumulative column and row edges.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::Span;

/// Cumulative positions of a composed table.
///
/// Columns are indexed like the source rows: column 0 is the row header, the
/// body starts at column 1. Body rows include section title and gap rows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableGeometry {
    /// `col_positions[i]` = x of column i's left edge; one extra final edge
    pub col_positions: Vec<f32>,
    pub col_widths: Vec<f32>,
    /// `row_positions[i]` = y of body row i's top edge, below the column header
    pub row_positions: Vec<f32>,
    pub row_heights: Vec<f32>,
    /// Number of column header rows
    pub header_rows: u32,
    /// Height of one header row
    pub header_row_height: f32,
    /// Header merges by (header row, column)
    #[serde(skip)]
    pub header_merges: HashMap<(u32, u32), MergeInfo>,
}

/// Information about a merged header region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfo {
    /// True if this cell is the top-left origin of the merge
    pub is_origin: bool,
    pub origin_row: u32,
    pub origin_col: u32,
    pub row_span: u32,
    pub col_span: u32,
}

/// Rectangle representing a cell's bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// True if this cell should be skipped (part of merge but not origin)
    pub skip: bool,
}

impl TableGeometry {
    /// Build geometry from pixel column widths, body row heights and header spans.
    pub fn new(
        col_widths_px: &[u32],
        row_heights_px: &[u32],
        header_rows: u32,
        header_row_height: u32,
        spans: &[Span],
    ) -> Self {
        let (col_positions, col_widths) = cumulative(col_widths_px);
        let (row_positions, row_heights) = cumulative(row_heights_px);

        let mut header_merges = HashMap::new();
        let last_row = header_rows.checked_sub(1);
        let last_col = u32::try_from(col_widths_px.len())
            .ok()
            .and_then(|n| n.checked_sub(1));
        for span in spans {
            let (Some(last_row), Some(last_col)) = (last_row, last_col) else {
                break;
            };
            let bounds = [span.row_start, span.row_end, span.col_start, span.col_end]
                .map(|v| u32::try_from(v).ok());
            let [Some(r0), Some(r1), Some(c0), Some(c1)] = bounds else {
                continue;
            };
            let (start_row, end_row) = ordered(r0, r1);
            let (start_col, end_col) = ordered(c0, c1);
            if start_row > last_row || start_col > last_col {
                continue;
            }
            let end_row = end_row.min(last_row);
            let end_col = end_col.min(last_col);
            let row_span = end_row - start_row + 1;
            let col_span = end_col - start_col + 1;

            for r in start_row..=end_row {
                for c in start_col..=end_col {
                    header_merges.insert(
                        (r, c),
                        MergeInfo {
                            is_origin: r == start_row && c == start_col,
                            origin_row: start_row,
                            origin_col: start_col,
                            row_span,
                            col_span,
                        },
                    );
                }
            }
        }

        Self {
            col_positions,
            col_widths,
            row_positions,
            row_heights,
            header_rows,
            header_row_height: header_row_height as f32,
            header_merges,
        }
    }

    /// Width of the fixed row header (column 0)
    pub fn row_header_width(&self) -> f32 {
        self.col_widths.first().copied().unwrap_or(0.0)
    }

    /// Height of the fixed column header
    pub fn column_header_height(&self) -> f32 {
        self.header_rows as f32 * self.header_row_height
    }

    /// Body cell bounds, relative to the top-left of the body area.
    ///
    /// `x = 0` is the left edge of column 1; the row header column (0) lies at
    /// negative `x`.
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        let x = self.col_positions.get(col as usize).copied().unwrap_or(0.0)
            - self.row_header_width();
        let y = self.row_positions.get(row as usize).copied().unwrap_or(0.0);
        CellRect {
            x,
            y,
            width: self.col_widths.get(col as usize).copied().unwrap_or(0.0),
            height: self.row_heights.get(row as usize).copied().unwrap_or(0.0),
            skip: false,
        }
    }

    /// Header cell bounds, honoring merged spans.
    pub fn header_cell_rect(&self, row: u32, col: u32) -> CellRect {
        let x = self.col_positions.get(col as usize).copied().unwrap_or(0.0);
        let y = row as f32 * self.header_row_height;
        let mut width = self.col_widths.get(col as usize).copied().unwrap_or(0.0);
        let mut height = self.header_row_height;

        if let Some(merge) = self.header_merges.get(&(row, col)) {
            if !merge.is_origin {
                return CellRect {
                    x,
                    y,
                    width,
                    height,
                    skip: true,
                };
            }
            let end_col = col + merge.col_span;
            width = self
                .col_positions
                .get(end_col as usize)
                .or(self.col_positions.last())
                .copied()
                .unwrap_or(x)
                - x;
            height = merge.row_span as f32 * self.header_row_height;
        }

        CellRect {
            x,
            y,
            width,
            height,
            skip: false,
        }
    }

    /// Find body row at y position (binary search)
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        locate(&self.row_positions, y)
    }

    /// Find column at x position (binary search). `x` is measured from the
    /// table's left edge, so the row header is column 0.
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        locate(&self.col_positions, x)
    }

    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Height of the body, excluding the column header
    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }
}

fn cumulative(sizes: &[u32]) -> (Vec<f32>, Vec<f32>) {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut widths = Vec::with_capacity(sizes.len());
    let mut edge: f32 = 0.0;
    for &size in sizes {
        positions.push(edge);
        let size = size as f32;
        widths.push(size);
        edge += size;
    }
    positions.push(edge); // Final edge
    (positions, widths)
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Index of the band containing `v`; `None` outside `[first, last)` edge.
fn locate(edges: &[f32], v: f32) -> Option<u32> {
    let last = *edges.last()?;
    if edges.len() < 2 || v < 0.0 || v >= last {
        return None;
    }
    let idx = match edges.binary_search_by(|pos| pos.partial_cmp(&v).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };
    u32::try_from(idx).ok()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn span(r0: i32, c0: i32, r1: i32, c1: i32) -> Span {
        Span {
            row_start: r0,
            col_start: c0,
            row_end: r1,
            col_end: c1,
            label: String::new(),
        }
    }

    #[test]
    fn test_basic_geometry() {
        let g = TableGeometry::new(&[50, 30, 30], &[40, 8, 40], 2, 40, &[]);
        assert_eq!(g.total_width(), 110.0);
        assert_eq!(g.total_height(), 88.0);
        assert_eq!(g.row_header_width(), 50.0);
        assert_eq!(g.column_header_height(), 80.0);

        let rect = g.cell_rect(2, 1);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 48.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn test_hit_testing() {
        let g = TableGeometry::new(&[50, 30, 30], &[40, 8, 40], 1, 40, &[]);
        assert_eq!(g.col_at_x(0.0), Some(0));
        assert_eq!(g.col_at_x(50.0), Some(1));
        assert_eq!(g.col_at_x(109.0), Some(2));
        assert_eq!(g.col_at_x(110.0), None);
        assert_eq!(g.row_at_y(39.9), Some(0));
        assert_eq!(g.row_at_y(40.0), Some(1));
        assert_eq!(g.row_at_y(50.0), Some(2));
        assert_eq!(g.row_at_y(-1.0), None);
    }

    #[test]
    fn test_cell_rect_is_body_local() {
        let g = TableGeometry::new(&[50, 30, 20], &[40, 40], 1, 40, &[]);
        assert_eq!(g.cell_rect(0, 2).x, 30.0);
        assert_eq!(g.cell_rect(1, 2).y, 40.0);
        assert_eq!(g.cell_rect(0, 0).x, -50.0);
    }

    #[test]
    fn test_empty_geometry() {
        let g = TableGeometry::new(&[], &[], 0, 40, &[]);
        assert_eq!(g.total_width(), 0.0);
        assert_eq!(g.col_at_x(0.0), None);
        assert_eq!(g.row_at_y(0.0), None);
    }

    #[test]
    fn test_header_merge() {
        // "Quartal" spanning columns 2..=3 of header row 0
        let g = TableGeometry::new(&[50, 30, 20, 20], &[], 2, 40, &[span(0, 2, 0, 3)]);
        let origin = g.header_cell_rect(0, 2);
        assert!(!origin.skip);
        assert_eq!(origin.width, 40.0);
        assert_eq!(origin.height, 40.0);
        assert!(g.header_cell_rect(0, 3).skip);
        assert!(!g.header_cell_rect(1, 3).skip);
    }

    #[test]
    fn test_vertical_merge_and_reversed_span() {
        let g = TableGeometry::new(&[50, 30], &[], 2, 40, &[span(1, 0, 0, 0)]);
        let origin = g.header_cell_rect(0, 0);
        assert_eq!(origin.height, 80.0);
        assert!(g.header_cell_rect(1, 0).skip);
    }

    #[test]
    fn test_negative_span_ignored() {
        let g = TableGeometry::new(&[50, 30], &[], 1, 40, &[span(0, -1, 0, 1), span(0, 1, 0, 1)]);
        assert!(!g.header_cell_rect(0, 0).skip);
        assert_eq!(g.header_cell_rect(0, 0).width, 50.0);
        assert_eq!(g.header_cell_rect(0, 1).width, 30.0);
    }

    #[test]
    fn test_merge_past_last_column_clamps() {
        let g = TableGeometry::new(&[50, 30], &[], 1, 40, &[span(0, 1, 0, 5)]);
        assert_eq!(g.header_cell_rect(0, 1).width, 30.0);
    }
}
