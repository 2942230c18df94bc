//! Envelope to render model mapping.
//!
//! For every installation the detector table (and, when present, the hardware
//! table) is densified, its editable columns are resolved to typed edit kinds
//! and its width hints are picked by precedence: hints sent on the wire, then
//! the [`ColumnWidthRegistry`], then nothing (layout measures the content).
//!
//! An installation without a detector table is dropped. That is a filter, not
//! an error: such an installation has nothing to show.

use std::collections::BTreeMap;

use tracing::debug;

use crate::densify::{densify, NOT_IN_USE};
use crate::types::{
    EditKind, Envelope, Grid, Installation, ProtocolConstruct, Table, TableKind, UiInstallation,
    UiTable,
};
use crate::widths::ColumnWidthRegistry;

/// Maps envelopes using a width registry.
#[derive(Debug, Clone)]
pub struct ProtocolMapper {
    registry: ColumnWidthRegistry,
}

impl Default for ProtocolMapper {
    fn default() -> Self {
        Self::new(ColumnWidthRegistry::builtin())
    }
}

impl ProtocolMapper {
    pub fn new(registry: ColumnWidthRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ColumnWidthRegistry {
        &self.registry
    }

    /// Map a whole envelope.
    pub fn to_construct(&self, envelope: &Envelope) -> ProtocolConstruct {
        let meta = &envelope.meta;
        let installation_type = meta.installation_type.as_str();

        let installations: Vec<UiInstallation> = envelope
            .protocol
            .installations
            .iter()
            .filter_map(|inst| self.map_installation(inst, installation_type))
            .collect();

        debug!(
            installation_type,
            wire = envelope.protocol.installations.len(),
            mapped = installations.len(),
            "mapped protocol envelope"
        );

        ProtocolConstruct {
            installation_type: meta.installation_type.clone(),
            maintenance_type: meta.maintenance_type.clone(),
            contract_number: meta.contract_number.clone(),
            customer_name: meta.customer_name.clone(),
            detector_type_catalog: envelope.protocol.detector_type_catalog.clone(),
            installations,
        }
    }

    fn map_installation(
        &self,
        installation: &Installation,
        installation_type: &str,
    ) -> Option<UiInstallation> {
        let Some(detector) = installation.detector_table.as_ref() else {
            debug!(name = %installation.name, "dropping installation without detector table");
            return None;
        };

        Some(UiInstallation {
            name: installation.name.clone(),
            detector: self.map_table(detector, TableKind::Detector, installation_type),
            hardware: installation
                .hardware_table
                .as_ref()
                .map(|hw| self.map_table(hw, TableKind::Hardware, installation_type)),
        })
    }

    /// Map one wire table into a [`UiTable`].
    pub fn map_table(&self, table: &Table, kind: TableKind, installation_type: &str) -> UiTable {
        let dense = densify(&table.grid, Some(NOT_IN_USE));
        let column_widths = self.resolve_width_hints(&table.grid, kind, installation_type);

        UiTable {
            header: table
                .head
                .as_ref()
                .map(|h| h.rows.clone())
                .unwrap_or_default(),
            spans: table
                .head
                .as_ref()
                .map(|h| h.spans.clone())
                .unwrap_or_default(),
            rows: dense.values,
            cell_types: Some(dense.cell_types),
            editable_columns: editable_columns(&table.grid, kind.default_edit_kind()),
            quarter_start_column: table
                .grid
                .quarter_start_column
                .and_then(|c| usize::try_from(c).ok()),
            rows_editable: table.rows_editable,
            column_widths,
        }
    }

    /// Wire hints win verbatim; otherwise the registry; otherwise unset.
    fn resolve_width_hints(
        &self,
        grid: &Grid,
        kind: TableKind,
        installation_type: &str,
    ) -> Option<Vec<Option<i32>>> {
        if let Some(hints) = &grid.column_width_hints {
            return Some(hints.clone());
        }
        let col_count = usize::try_from(grid.col_count).unwrap_or(0);
        self.registry.hints_for(kind, installation_type, col_count)
    }
}

/// Map an envelope with the built-in width registry.
pub fn to_construct(envelope: &Envelope) -> ProtocolConstruct {
    ProtocolMapper::default().to_construct(envelope)
}

/// Resolve the wire's string-keyed edit map.
///
/// Keys that are not column indices are dropped; empty or unknown tags fall
/// back to `default_kind`.
pub fn editable_columns(grid: &Grid, default_kind: EditKind) -> BTreeMap<usize, EditKind> {
    grid.editable_columns
        .iter()
        .filter_map(|(key, tag)| {
            let col = key.trim().parse::<usize>().ok()?;
            Some((col, EditKind::from_tag(tag).unwrap_or(default_kind)))
        })
        .collect()
}
