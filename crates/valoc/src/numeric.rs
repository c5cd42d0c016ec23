//! Rule-parameter coercion.
//!
//! Rule parameters arrive from the engine as strings (`"5"`, `"5.7"`,
//! `"abc"`). Pluralized translation needs a count, and message templates
//! read better with a typed parameter, so parameters are coerced to an
//! integer or float when they parse as one.

/// A rule parameter that parsed as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Plural-selection count: the integer value, or the float truncated
    /// toward zero.
    pub(crate) fn count(self) -> i64 {
        match self {
            Numeric::Int(i) => i,
            Numeric::Float(f) => f as i64,
        }
    }

    pub(crate) fn to_value(self) -> serde_json::Value {
        match self {
            Numeric::Int(i) => serde_json::Value::from(i),
            Numeric::Float(f) => serde_json::Value::from(f),
        }
    }
}

/// Attempts a base-10 integer parse, then a float parse. Returns `None`
/// when neither succeeds; the caller keeps the original string.
///
/// Non-finite floats are rejected so the value survives JSON conversion.
pub(crate) fn parse_numeric(raw: &str) -> Option<Numeric> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Numeric::Int(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Some(Numeric::Float(f));
        }
    }
    None
}
