//! Sparse grid to dense matrix conversion.
//!
//! The wire only lists cells that carry something. [`densify`] materializes the
//! full `row_count x col_count` value and type matrices. Cells outside the
//! declared bounds are dropped silently so that a producer whose counts lag
//! a row or column behind still yields a usable table.

use tracing::trace;

use crate::types::{display_or_empty, Grid};

/// Placeholder type for cells the installation does not use.
pub const NOT_IN_USE: &str = "NotInUse";

/// Dense value and type matrices of one grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenseTable {
    pub values: Vec<Vec<String>>,
    pub cell_types: Vec<Vec<Option<String>>>,
}

impl DenseTable {
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn col_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }
}

/// Materialize a sparse grid.
///
/// With `default_type` set, every cell that has no sparse entry gets that
/// type; cells that do have an entry keep their own (possibly absent) type.
pub fn densify(grid: &Grid, default_type: Option<&str>) -> DenseTable {
    let (Ok(rows), Ok(cols)) = (
        usize::try_from(grid.row_count),
        usize::try_from(grid.col_count),
    ) else {
        return DenseTable::default();
    };
    if rows == 0 || cols == 0 {
        return DenseTable::default();
    }

    let mut values = vec![vec![String::new(); cols]; rows];
    let mut cell_types: Vec<Vec<Option<String>>> = vec![vec![None; cols]; rows];
    let mut present = vec![vec![false; cols]; rows];

    for cell in grid.cells() {
        let (Ok(r), Ok(c)) = (usize::try_from(cell.r), usize::try_from(cell.c)) else {
            trace!(row = cell.r, col = cell.c, "discarding negative cell coordinate");
            continue;
        };
        let slot = values
            .get_mut(r)
            .and_then(|row| row.get_mut(c))
            .zip(cell_types.get_mut(r).and_then(|row| row.get_mut(c)))
            .zip(present.get_mut(r).and_then(|row| row.get_mut(c)));
        let Some(((value, cell_type), seen)) = slot else {
            trace!(row = r, col = c, rows, cols, "discarding out-of-range cell");
            continue;
        };
        *value = display_or_empty(cell.v.as_ref());
        *cell_type = cell.t.as_ref().map(|t| t.to_display_string());
        *seen = true;
    }

    if let Some(default_type) = default_type {
        for (type_row, present_row) in cell_types.iter_mut().zip(&present) {
            for (cell_type, seen) in type_row.iter_mut().zip(present_row) {
                if !seen {
                    *cell_type = Some(default_type.to_string());
                }
            }
        }
    }

    DenseTable { values, cell_types }
}
