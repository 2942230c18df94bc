//! Layout engine for composed protocol tables.
//!
//! This module handles:
//! - Converting width hints and measured content into pixel column widths
//! - Stacking several tables under one fixed column header
//! - Pre-computing cell positions for hit testing
//! - Building per-installation pages

mod column_widths;
mod compositor;
mod config;
mod geometry;
mod measure;
mod page;

pub use column_widths::{fit_widths, WidthResolver};
pub use compositor::{
    pad_table, CellStyle, LayoutCell, LayoutRow, LayoutTable, RowKind, TableCompositor,
};
pub use config::{round_px, LayoutConfig, LayoutMetrics, PageMode};
pub use geometry::{CellRect, MergeInfo, TableGeometry};
#[cfg(target_arch = "wasm32")]
pub use measure::CanvasMeasure;
pub use measure::{default_measure, MonospaceMeasure, TextMeasure};
pub use page::{tab_title, InstallationPage, PageBuilder, SectionTitles};
