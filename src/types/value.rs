use serde::{Deserialize, Serialize};

/// A scalar carried in a cell's `v` or `t` slot.
///
/// The producer writes whatever JSON it has at hand, so numbers, booleans and
/// strings all show up. `null` and missing slots are represented by
/// `Option::None` on the owning [`Cell`](super::Cell), not by a variant here.
/// The value is turned into display text exactly once, in
/// [`densify`](crate::densify::densify); nothing downstream looks at the
/// variant again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arrays or objects. Not expected from a well-behaved producer.
    Other(serde_json::Value),
}

impl CellScalar {
    /// Render the scalar the way the protocol producer prints it.
    ///
    /// - booleans: `true` / `false`
    /// - integers: plain decimal
    /// - floats: shortest round-trip form, always with a fractional part (`2.0`, `0.25`)
    /// - strings: verbatim
    /// - anything else: compact JSON
    pub fn to_display_string(&self) -> String {
        match self {
            CellScalar::Bool(b) => b.to_string(),
            CellScalar::Int(n) => n.to_string(),
            CellScalar::Float(f) => format!("{f:?}"),
            CellScalar::Text(s) => s.clone(),
            CellScalar::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for CellScalar {
    fn from(s: &str) -> Self {
        CellScalar::Text(s.to_string())
    }
}

impl From<String> for CellScalar {
    fn from(s: String) -> Self {
        CellScalar::Text(s)
    }
}

impl From<i64> for CellScalar {
    fn from(n: i64) -> Self {
        CellScalar::Int(n)
    }
}

impl From<f64> for CellScalar {
    fn from(f: f64) -> Self {
        CellScalar::Float(f)
    }
}

impl From<bool> for CellScalar {
    fn from(b: bool) -> Self {
        CellScalar::Bool(b)
    }
}

/// Display text for an optional scalar; `None` (JSON `null`) renders empty.
pub fn display_or_empty(value: Option<&CellScalar>) -> String {
    value.map(CellScalar::to_display_string).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<CellScalar> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_null_is_none() {
        assert_eq!(parse("null"), None);
        assert_eq!(display_or_empty(None), "");
    }

    #[test]
    fn test_scalar_variants() {
        assert_eq!(parse("true"), Some(CellScalar::Bool(true)));
        assert_eq!(parse("42"), Some(CellScalar::Int(42)));
        assert_eq!(parse("-7"), Some(CellScalar::Int(-7)));
        assert_eq!(parse("1.5"), Some(CellScalar::Float(1.5)));
        assert_eq!(parse("\"OM\""), Some(CellScalar::Text("OM".into())));
    }

    #[test]
    fn test_display_coercion() {
        assert_eq!(CellScalar::Bool(false).to_display_string(), "false");
        assert_eq!(CellScalar::Int(12).to_display_string(), "12");
        assert_eq!(CellScalar::Float(2.0).to_display_string(), "2.0");
        assert_eq!(CellScalar::Float(0.1).to_display_string(), "0.1");
        assert_eq!(CellScalar::Text("Q1".into()).to_display_string(), "Q1");
    }

    #[test]
    fn test_integral_json_stays_integer() {
        let v = parse("3").unwrap();
        assert_eq!(v.to_display_string(), "3");
        let v = parse("3.0").unwrap();
        assert_eq!(v.to_display_string(), "3.0");
    }

    #[test]
    fn test_structured_value_renders_as_json() {
        let v = parse("[1,2]").unwrap();
        assert_eq!(v.to_display_string(), "[1,2]");
    }
}
