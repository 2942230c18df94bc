//! Layout of one installation page (its detector and hardware tables).

use serde::Serialize;

use crate::error::{ProtogridError, Result};
use crate::toggle::{CellKey, Transition};
use crate::types::{TableKind, UiInstallation, UiTable, UiTableSection};
use crate::widths::ColumnWidthRegistry;

use super::{fit_widths, LayoutTable, PageMode, TableCompositor, TextMeasure};

/// Composed tables of one installation.
///
/// In [`PageMode::Separate`] there is one table for the detector list and one
/// for the hardware list (if present); in [`PageMode::Stacked`] a single table
/// holds both as titled sections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationPage {
    pub title: String,
    pub tables: Vec<LayoutTable>,
}

impl InstallationPage {
    /// Toggle an interactive cell of table `table` with the selected marker.
    pub fn activate(&mut self, table: usize, key: &CellKey, fill: &str) -> Option<Transition> {
        self.tables.get_mut(table)?.activate(key, fill)
    }
}

/// Section titles used in stacked mode.
#[derive(Debug, Clone, Copy)]
pub struct SectionTitles<'a> {
    pub detector: &'a str,
    pub hardware: &'a str,
}

/// Builds installation pages for one installation type.
pub struct PageBuilder<'a, M: TextMeasure + ?Sized> {
    pub compositor: TableCompositor<'a, M>,
    pub registry: &'a ColumnWidthRegistry,
    pub installation_type: &'a str,
    pub mode: PageMode,
    pub titles: SectionTitles<'a>,
}

impl<'a, M: TextMeasure + ?Sized> PageBuilder<'a, M> {
    /// Compose the page for `installation`; `index` only feeds the fallback title.
    pub fn build(&self, installation: &UiInstallation, index: usize) -> Result<InstallationPage> {
        let detector = self.with_width_hints(&installation.detector, TableKind::Detector);
        let hardware = installation
            .hardware
            .as_ref()
            .map(|hw| self.with_width_hints(hw, TableKind::Hardware));

        let tables = match self.mode {
            PageMode::Separate => {
                let mut tables = vec![self.compositor.compose(&[UiTableSection::new(detector)])?];
                if let Some(hw) = hardware {
                    tables.push(self.compositor.compose(&[UiTableSection::new(hw)])?);
                }
                tables
            }
            PageMode::Stacked => {
                let mut sections = vec![UiTableSection::titled(self.titles.detector, detector)];
                if let Some(hw) = hardware {
                    sections.push(UiTableSection::titled(self.titles.hardware, hw));
                }
                vec![self.compositor.compose(&sections)?]
            }
        };

        Ok(InstallationPage {
            title: tab_title(&installation.name, index),
            tables,
        })
    }

    /// Compose page `index` of a list of installations.
    pub fn build_at(&self, installations: &[UiInstallation], index: usize) -> Result<InstallationPage> {
        let installation = installations.get(index).ok_or_else(|| {
            ProtogridError::InvalidArgument(format!(
                "installation index {index} out of range ({} installations)",
                installations.len()
            ))
        })?;
        self.build(installation, index)
    }

    /// The table's own hints fitted to its column count, else registry hints.
    fn with_width_hints(&self, table: &UiTable, kind: TableKind) -> UiTable {
        let cols = table.col_count();
        let registry = self.registry.hints_for(kind, self.installation_type, cols);
        let hints = match &table.column_widths {
            Some(own) => Some(fit_widths(own, registry.as_deref(), cols)),
            None => registry,
        };
        table.with_column_widths(hints)
    }
}

/// Tab label of an installation: its name, or `Anlage {n}` (1-based) when blank.
pub fn tab_title(name: &str, index: usize) -> String {
    if name.trim().is_empty() {
        format!("Anlage {}", index + 1)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::{LayoutMetrics, MonospaceMeasure};

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| (*s).to_string()).collect()
    }

    fn ui_table(cols: usize, hints: Option<Vec<Option<i32>>>) -> UiTable {
        let header: Vec<&str> = std::iter::repeat("h").take(cols).collect();
        UiTable {
            header: vec![strings(&header)],
            rows: vec![strings(&header)],
            column_widths: hints,
            ..UiTable::default()
        }
    }

    fn build(installation: &UiInstallation, mode: PageMode, p_type: &str) -> InstallationPage {
        let measure = MonospaceMeasure::new(10.0);
        let registry = ColumnWidthRegistry::builtin();
        let builder = PageBuilder {
            compositor: TableCompositor::new(LayoutMetrics::default(), &measure),
            registry: &registry,
            installation_type: p_type,
            mode,
            titles: SectionTitles {
                detector: "Melder",
                hardware: "Hardware",
            },
        };
        builder.build(installation, 2).unwrap()
    }

    #[test]
    fn test_tab_title() {
        assert_eq!(tab_title("Haupthaus", 0), "Haupthaus");
        assert_eq!(tab_title("  ", 2), "Anlage 3");
    }

    #[test]
    fn test_separate_tables_use_own_registry_widths() {
        let inst = UiInstallation {
            name: String::new(),
            detector: ui_table(3, None),
            hardware: Some(ui_table(2, None)),
        };
        let page = build(&inst, PageMode::Separate, "BMA");
        assert_eq!(page.title, "Anlage 3");
        assert_eq!(page.tables.len(), 2);
        // BMA detector: 4, 2, 6 chars at 10px + 16px padding
        assert_eq!(page.tables[0].col_widths, vec![56, 36, 76]);
        // BMA hardware: 6, 4 chars
        assert_eq!(page.tables[1].col_widths, vec![76, 56]);
    }

    #[test]
    fn test_own_hints_fitted_with_registry_fallback() {
        let inst = UiInstallation {
            name: "A".into(),
            detector: ui_table(4, Some(vec![Some(1)])),
            hardware: None,
        };
        let page = build(&inst, PageMode::Separate, "bma");
        assert_eq!(page.tables.len(), 1);
        assert_eq!(page.tables[0].col_widths, vec![26, 36, 76, 36]);
    }

    #[test]
    fn test_unknown_type_measures_content() {
        let inst = UiInstallation {
            name: "A".into(),
            detector: ui_table(2, None),
            hardware: None,
        };
        let page = build(&inst, PageMode::Separate, "XYZ");
        assert_eq!(page.tables[0].col_widths, vec![26, 26]);
    }

    #[test]
    fn test_stacked_mode_single_table() {
        let inst = UiInstallation {
            name: "A".into(),
            detector: ui_table(3, None),
            hardware: Some(ui_table(2, None)),
        };
        let page = build(&inst, PageMode::Stacked, "BMA");
        assert_eq!(page.tables.len(), 1);
        let table = &page.tables[0];
        // title, data, gap, title, data
        assert_eq!(table.body.len(), 5);
        assert_eq!(table.row_header[3].cells[0].text, "Hardware");
        // detector hints win for the shared columns
        assert_eq!(table.col_widths, vec![56, 36, 76]);
    }
}
