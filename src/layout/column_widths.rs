//! Column width resolution at layout time.
//!
//! Tables that are stacked under one column header must share their column
//! geometry. For each column the first table (in order) that carries a
//! character hint decides the width; only columns without any hint are sized
//! from their content.

use crate::types::UiTable;

use super::{round_px, LayoutMetrics, TextMeasure};

/// Resolves character hints and content into pixel widths.
pub struct WidthResolver<'a, M: TextMeasure + ?Sized> {
    metrics: &'a LayoutMetrics,
    measure: &'a M,
}

impl<'a, M: TextMeasure + ?Sized> WidthResolver<'a, M> {
    pub fn new(metrics: &'a LayoutMetrics, measure: &'a M) -> Self {
        Self { metrics, measure }
    }

    /// Pixel width for each of `total_cols` columns, shared by all `tables`.
    pub fn resolve(&self, tables: &[&UiTable], total_cols: usize) -> Vec<u32> {
        (0..total_cols)
            .map(|col| match tables.iter().find_map(|t| t.width_hint(col)) {
                Some(chars) => self.width_from_chars(chars),
                None => self.measure_column(tables, col),
            })
            .collect()
    }

    /// Width of `chars` reference glyphs plus padding on both sides.
    pub fn width_from_chars(&self, chars: i32) -> u32 {
        let Ok(count) = usize::try_from(chars) else {
            return self.metrics.min_empty_col;
        };
        if count == 0 {
            return self.metrics.min_empty_col;
        }
        let sample: String = std::iter::repeat(self.metrics.sample_char)
            .take(count)
            .collect();
        self.padded(self.measure.measure(&sample))
    }

    /// Widest header text, body value or non-blank type string in `col`.
    pub fn measure_column(&self, tables: &[&UiTable], col: usize) -> u32 {
        let mut max_px: f32 = 0.0;
        let mut widen = |text: &str| {
            if !text.is_empty() {
                max_px = max_px.max(self.measure.measure(text));
            }
        };

        for table in tables {
            for row in &table.header {
                widen(row.get(col).map_or("", String::as_str));
            }
            for (row_idx, row) in table.rows.iter().enumerate() {
                widen(row.get(col).map_or("", String::as_str));
                if let Some(placeholder) = table.cell_type(row_idx, col) {
                    if !placeholder.trim().is_empty() {
                        widen(placeholder);
                    }
                }
            }
        }

        if max_px > 0.0 {
            self.padded(max_px)
        } else {
            self.metrics.min_empty_col
        }
    }

    fn padded(&self, text_px: f32) -> u32 {
        round_px(text_px + (self.metrics.pad_h * 2) as f32)
    }
}

/// Clip or extend a table's own hints to exactly `total_cols` entries.
///
/// Longer lists are truncated. Missing trailing columns take the matching
/// `fallback` hint when there is one, otherwise repeat the last known hint.
pub fn fit_widths(
    hints: &[Option<i32>],
    fallback: Option<&[Option<i32>]>,
    total_cols: usize,
) -> Vec<Option<i32>> {
    let mut fitted: Vec<Option<i32>> = hints.iter().take(total_cols).copied().collect();
    let mut last_known = fitted.iter().rev().find_map(|w| *w);

    for col in fitted.len()..total_cols {
        let next = fallback
            .and_then(|f| f.get(col).copied().flatten())
            .or(last_known);
        if next.is_some() {
            last_known = next;
        }
        fitted.push(next);
    }
    fitted
}
