//! Structured error types for protogrid.
//!
//! Only a few operations can fail at all: composing zero sections, decoding
//! envelope or config JSON, and CLI file I/O. Everything else in the pipeline filters
//! instead of failing (see the module docs of `densify` and `mapper`).

/// All errors that can occur while decoding envelopes or composing layouts.
#[derive(Debug, thiserror::Error)]
pub enum ProtogridError {
    /// A caller passed an argument the operation cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Envelope or config JSON could not be decoded or encoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file (CLI).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProtogridError>;

impl From<ProtogridError> for wasm_bindgen::JsValue {
    fn from(e: ProtogridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::Envelope;

    fn read(path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn test_io_error_converts() {
        let err = read("/nonexistent/protogrid/envelope.json").unwrap_err();
        assert!(matches!(err, ProtogridError::Io(_)));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_json_error_converts() {
        let err = Envelope::from_json("{\"Meta\": 3").unwrap_err();
        assert!(matches!(err, ProtogridError::Json(_)));
    }
}
