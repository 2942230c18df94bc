//! Layout configuration and derived pixel metrics.

use serde::{Deserialize, Serialize};

/// How an installation's detector and hardware tables are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageMode {
    /// One fixed-header table per source table, each with its own widths.
    #[default]
    Separate,
    /// Both tables stacked under one column header, sharing widths.
    Stacked,
}

/// User-facing layout settings, in density-independent units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Text size in sp
    pub text_size_sp: f32,
    /// Minimum row height in dp
    pub row_height_dp: u32,
    /// Horizontal padding on each side of a cell in dp
    pub pad_h_dp: u32,
    /// Width of a column with nothing to measure, in dp
    pub min_empty_col_dp: u32,
    /// Height of the blank row between stacked sections, in dp
    pub gap_height_dp: u32,
    /// Pixels per dp (1.0 = mdpi)
    pub density: f32,
    /// Pixels per sp
    pub scaled_density: f32,
    /// Reference glyph for character-count width hints
    pub sample_char: char,
    /// Advance of one glyph relative to the font size, for the monospace measurer
    pub glyph_width_ratio: f32,
    pub page_mode: PageMode,
    /// Section titles in stacked mode
    pub detector_title: String,
    pub hardware_title: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            text_size_sp: 14.0,
            row_height_dp: 40,
            pad_h_dp: 8,
            min_empty_col_dp: 40,
            gap_height_dp: 8,
            density: 1.0,
            scaled_density: 1.0,
            sample_char: '0',
            glyph_width_ratio: 0.6,
            page_mode: PageMode::Separate,
            detector_title: "Melder".to_string(),
            hardware_title: "Hardware".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Decode a config from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics::from_config(self)
    }
}

/// [`LayoutConfig`] resolved to device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub font_px: f32,
    pub row_height: u32,
    pub pad_h: u32,
    pub min_empty_col: u32,
    pub gap_height: u32,
    pub sample_char: char,
}

impl LayoutMetrics {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let density = positive_or_one(config.density);
        let scaled = positive_or_one(config.scaled_density);
        let dp = |v: u32| round_px(v as f32 * density);

        Self {
            font_px: config.text_size_sp * scaled,
            row_height: dp(config.row_height_dp),
            pad_h: dp(config.pad_h_dp),
            min_empty_col: dp(config.min_empty_col_dp),
            gap_height: dp(config.gap_height_dp),
            sample_char: config.sample_char,
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

fn positive_or_one(v: f32) -> f32 {
    if v > 0.0 {
        v
    } else {
        1.0
    }
}

/// Round a non-negative pixel measure to whole pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_px(v: f32) -> u32 {
    if v.is_finite() {
        v.max(0.0).min(u32::MAX as f32).round() as u32
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics() {
        let m = LayoutMetrics::default();
        assert_eq!(m.row_height, 40);
        assert_eq!(m.pad_h, 8);
        assert_eq!(m.min_empty_col, 40);
        assert_eq!(m.gap_height, 8);
        assert_eq!(m.font_px, 14.0);
    }

    #[test]
    fn test_density_scaling() {
        let config = LayoutConfig {
            density: 2.625,
            scaled_density: 3.0,
            ..LayoutConfig::default()
        };
        let m = config.metrics();
        assert_eq!(m.row_height, 105);
        assert_eq!(m.pad_h, 21);
        assert_eq!(m.font_px, 42.0);
    }

    #[test]
    fn test_non_positive_density_treated_as_one() {
        let config = LayoutConfig {
            density: 0.0,
            scaled_density: -2.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.metrics(), LayoutMetrics::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LayoutConfig::from_json(r#"{"padHDp": 4, "pageMode": "stacked"}"#).unwrap();
        assert_eq!(config.pad_h_dp, 4);
        assert_eq!(config.page_mode, PageMode::Stacked);
        assert_eq!(config.row_height_dp, 40);
    }

    #[test]
    fn test_round_px() {
        assert_eq!(round_px(10.5), 11);
        assert_eq!(round_px(-3.0), 0);
        assert_eq!(round_px(f32::NAN), 0);
    }
}
