//! An opened protocol and the quarter marker currently selected for stamping.
//!
//! The session owns the mapped [`ProtocolConstruct`] as a plain value and
//! hands it to the layout calls; there is no process-wide "current protocol".

use crate::error::Result;
use crate::layout::{
    default_measure, InstallationPage, LayoutConfig, PageBuilder, SectionTitles, TableCompositor,
    TextMeasure,
};
use crate::mapper::ProtocolMapper;
use crate::store::{load_construct, ProtocolStore};
use crate::toggle::{CellKey, Transition};
use crate::types::ProtocolConstruct;

/// Markers offered for stamping cells.
pub const QUARTER_MARKERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

pub struct ProtocolSession {
    construct: ProtocolConstruct,
    mapper: ProtocolMapper,
    config: LayoutConfig,
    selected_quarter: String,
}

impl ProtocolSession {
    pub fn new(construct: ProtocolConstruct, mapper: ProtocolMapper, config: LayoutConfig) -> Self {
        Self {
            construct,
            mapper,
            config,
            selected_quarter: QUARTER_MARKERS[0].to_string(),
        }
    }

    /// Open the protocol stored under `key`, or the latest one.
    pub fn open<S: ProtocolStore + ?Sized>(
        store: &S,
        key: Option<&str>,
        mapper: ProtocolMapper,
        config: LayoutConfig,
    ) -> Option<Self> {
        let construct = load_construct(store, &mapper, key)?;
        Some(Self::new(construct, mapper, config))
    }

    pub fn construct(&self) -> &ProtocolConstruct {
        &self.construct
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn selected_quarter(&self) -> &str {
        &self.selected_quarter
    }

    /// Select the marker used for the next activations. Blank labels are ignored.
    pub fn select_quarter(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.selected_quarter = label.to_string();
        true
    }

    /// One label per installation tab.
    pub fn tab_titles(&self) -> Vec<String> {
        self.construct
            .installations
            .iter()
            .enumerate()
            .map(|(i, inst)| crate::layout::tab_title(&inst.name, i))
            .collect()
    }

    /// Compose the page of installation `index` with the given measurer.
    pub fn page_with<M: TextMeasure + ?Sized>(
        &self,
        index: usize,
        measure: &M,
    ) -> Result<InstallationPage> {
        let builder = PageBuilder {
            compositor: TableCompositor::new(self.config.metrics(), measure),
            registry: self.mapper.registry(),
            installation_type: &self.construct.installation_type,
            mode: self.config.page_mode,
            titles: SectionTitles {
                detector: &self.config.detector_title,
                hardware: &self.config.hardware_title,
            },
        };
        builder.build_at(&self.construct.installations, index)
    }

    /// Compose the page of installation `index` with the target's default measurer.
    pub fn page(&self, index: usize) -> Result<InstallationPage> {
        let measure = default_measure(&self.config.metrics(), self.config.glyph_width_ratio);
        self.page_with(index, measure.as_ref())
    }

    /// Stamp or clear a cell with the selected marker.
    pub fn activate(
        &self,
        page: &mut InstallationPage,
        table: usize,
        key: &CellKey,
    ) -> Option<Transition> {
        page.activate(table, key, &self.selected_quarter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{Envelope, UiInstallation, UiTable};

    fn construct() -> ProtocolConstruct {
        let table = UiTable {
            header: vec![vec!["Nr".into(), "Q1".into()]],
            rows: vec![vec!["1".into(), String::new()]],
            cell_types: Some(vec![vec![None, Some("OM".into())]]),
            ..UiTable::default()
        };
        ProtocolConstruct {
            installation_type: "BMA".into(),
            installations: vec![
                UiInstallation {
                    name: "Haupthaus".into(),
                    detector: table.clone(),
                    hardware: None,
                },
                UiInstallation {
                    name: String::new(),
                    detector: table,
                    hardware: None,
                },
            ],
            ..ProtocolConstruct::default()
        }
    }

    fn session() -> ProtocolSession {
        ProtocolSession::new(construct(), ProtocolMapper::default(), LayoutConfig::default())
    }

    #[test]
    fn test_quarter_selection() {
        let mut s = session();
        assert_eq!(s.selected_quarter(), "Q1");
        assert!(s.select_quarter("Q3"));
        assert!(!s.select_quarter("  "));
        assert_eq!(s.selected_quarter(), "Q3");
    }

    #[test]
    fn test_tab_titles() {
        assert_eq!(session().tab_titles(), vec!["Haupthaus", "Anlage 2"]);
    }

    #[test]
    fn test_activate_uses_selected_quarter() {
        let mut s = session();
        s.select_quarter("Q4");
        let mut page = s.page(0).unwrap();
        let key = CellKey::new(0, 0, 1);

        assert_eq!(s.activate(&mut page, 0, &key), Some(Transition::Filled("Q4".into())));
        assert_eq!(page.tables[0].body_cell(&key).unwrap().text, "Q4");
        assert_eq!(s.activate(&mut page, 0, &key), Some(Transition::Cleared("OM".into())));
        assert_eq!(s.activate(&mut page, 5, &key), None);
    }

    #[test]
    fn test_page_out_of_range() {
        assert!(session().page(9).is_err());
    }

    #[test]
    fn test_open_from_store() {
        let mut store = MemoryStore::new();
        let mut env = Envelope::default();
        env.meta.contract_number = "V-1".into();
        store.save_envelope(env);

        let s = ProtocolSession::open(&store, Some("V-1"), ProtocolMapper::default(), LayoutConfig::default())
            .unwrap();
        assert_eq!(s.construct().contract_number, "V-1");
        assert!(ProtocolSession::open(&store, Some("nope"), ProtocolMapper::default(), LayoutConfig::default())
            .is_none());
    }
}
