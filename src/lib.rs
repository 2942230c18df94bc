//! protogrid - inspection protocols as fixed-header grid tables
//!
//! Turns the sparse JSON envelope of a fire-alarm / sprinkler maintenance
//! protocol into render-ready tables:
//! - Sparse cell lists densified into value and placeholder matrices
//! - Column widths from wire hints, per-installation-type rules or measured content
//! - Detector and hardware lists stacked under one shared column header
//! - Corner / column header / row header / body split with pixel geometry
//! - Quarter-marker toggling of editable cells
//!
//! # Usage (Rust)
//!
//! ```rust
//! use protogrid::layout::{LayoutConfig, LayoutMetrics, MonospaceMeasure, TableCompositor};
//! use protogrid::types::{Envelope, UiTableSection};
//!
//! let json = r#"{"Meta": {"pType": "BMA"}, "Protokoll": {"anlagen": [{
//!     "name": "Haupthaus",
//!     "melder": {"grid": {"nRows": 1, "nCols": 3, "body": [[{"r": 0, "c": 0, "v": "1"}]]}}
//! }]}}"#;
//! let envelope = Envelope::from_json(json).unwrap();
//! let construct = protogrid::mapper::to_construct(&envelope);
//!
//! let metrics = LayoutConfig::default().metrics();
//! let measure = MonospaceMeasure::for_font(&metrics, 0.6);
//! let detector = construct.installations[0].detector.clone();
//! let layout = TableCompositor::new(metrics, &measure)
//!     .compose(&[UiTableSection::new(detector)])
//!     .unwrap();
//! assert_eq!(layout.body.len(), layout.row_header.len());
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { map_envelope, compose_installation } from 'protogrid';
//! await init();
//! const construct = map_envelope(json);
//! const page = compose_installation(json, 0);
//! ```

pub mod densify;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod session;
pub mod store;
pub mod toggle;
pub mod types;
pub mod widths;

use wasm_bindgen::prelude::*;

pub use error::{ProtogridError, Result};
pub use session::ProtocolSession;
pub use types::*;

/// Map an envelope JSON string to the render model.
///
/// # Errors
/// Returns an error if the JSON is not a valid envelope.
#[wasm_bindgen]
pub fn map_envelope(json: &str) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let envelope = Envelope::from_json(json).map_err(JsValue::from)?;
    let construct = mapper::to_construct(&envelope);

    serde_wasm_bindgen::to_value(&construct)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Compose the page of installation `index` of an envelope.
///
/// `config_json` is an optional [`layout::LayoutConfig`] as JSON; missing
/// fields keep their defaults.
///
/// # Errors
/// Returns an error if the envelope or config is invalid or `index` is out of range.
#[wasm_bindgen]
pub fn compose_installation(
    json: &str,
    index: usize,
    config_json: Option<String>,
) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let page = compose_page(json, index, config_json.as_deref()).map_err(JsValue::from)?;

    serde_wasm_bindgen::to_value(&page)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Decode, map and compose one installation page.
pub fn compose_page(
    json: &str,
    index: usize,
    config_json: Option<&str>,
) -> Result<layout::InstallationPage> {
    let envelope = Envelope::from_json(json)?;
    let config = match config_json {
        Some(cfg) => layout::LayoutConfig::from_json(cfg)?,
        None => layout::LayoutConfig::default(),
    };
    let mapper = mapper::ProtocolMapper::default();
    let construct = mapper.to_construct(&envelope);
    ProtocolSession::new(construct, mapper, config).page(index)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
