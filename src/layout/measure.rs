//! Text measurement for column sizing.
//!
//! Layout only needs one number per string: its advance width in pixels under
//! the active font. Hosts that can ask a real font engine plug in their own
//! [`TextMeasure`]; everything else uses [`MonospaceMeasure`].

use super::LayoutMetrics;

/// Measures the rendered width of a single line of text, in pixels.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f32,
}

impl MonospaceMeasure {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }

    /// Advance derived from the font size and a glyph/em ratio.
    pub fn for_font(metrics: &LayoutMetrics, glyph_width_ratio: f32) -> Self {
        Self::new(metrics.font_px * glyph_width_ratio)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}

/// Canvas 2D text measurement (browser only).
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasMeasure;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::TextMeasure;

    /// Measures with an offscreen `<canvas>` 2D context, caching per string.
    pub struct CanvasMeasure {
        ctx: CanvasRenderingContext2d,
        cache: RefCell<HashMap<String, f32>>,
    }

    impl CanvasMeasure {
        /// Create a measurer for `font_px` sans-serif text; `None` outside a DOM.
        pub fn new(font_px: f32) -> Option<Self> {
            let document = web_sys::window()?.document()?;
            let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
            let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
            ctx.set_font(&format!("{font_px}px sans-serif"));
            Some(Self {
                ctx,
                cache: RefCell::new(HashMap::new()),
            })
        }
    }

    impl TextMeasure for CanvasMeasure {
        #[allow(clippy::cast_possible_truncation)]
        fn measure(&self, text: &str) -> f32 {
            if let Some(width) = self.cache.borrow().get(text) {
                return *width;
            }
            let width = self
                .ctx
                .measure_text(text)
                .map(|m| m.width() as f32)
                .unwrap_or(0.0);
            self.cache.borrow_mut().insert(text.to_string(), width);
            width
        }
    }
}

/// Best measurer available on this target.
#[cfg(target_arch = "wasm32")]
pub fn default_measure(metrics: &LayoutMetrics, glyph_width_ratio: f32) -> Box<dyn TextMeasure> {
    match CanvasMeasure::new(metrics.font_px) {
        Some(canvas) => Box::new(canvas),
        None => Box::new(MonospaceMeasure::for_font(metrics, glyph_width_ratio)),
    }
}

/// Best measurer available on this target.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_measure(metrics: &LayoutMetrics, glyph_width_ratio: f32) -> Box<dyn TextMeasure> {
    Box::new(MonospaceMeasure::for_font(metrics, glyph_width_ratio))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_counts_chars_not_bytes() {
        let m = MonospaceMeasure::new(10.0);
        assert_eq!(m.measure(""), 0.0);
        assert_eq!(m.measure("abc"), 30.0);
        assert_eq!(m.measure("Prüfung"), 70.0);
    }

    #[test]
    fn test_for_font() {
        let metrics = LayoutMetrics::default();
        let m = MonospaceMeasure::for_font(&metrics, 0.5);
        assert_eq!(m.advance, 7.0);
    }

    #[test]
    fn test_boxed_measure_delegates() {
        let boxed = default_measure(&LayoutMetrics::default(), 0.5);
        assert_eq!(boxed.measure("ab"), 14.0);
    }
}
