//! Scalar values carried by compiled pattern events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The literal rest marker in mini-notation.
pub const REST: &str = "~";

/// A step value as written in the notation, or produced by a transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Value::Text(s) if s == REST)
    }

    /// Numeric reading of the value, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest() {
        assert!(Value::text("~").is_rest());
        assert!(!Value::text("c").is_rest());
        assert!(!Value::Number(0.0).is_rest());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::text("-1").as_number(), Some(-1.0));
        assert_eq!(Value::text(" 2 ").as_number(), Some(2.0));
        assert_eq!(Value::Number(3.5).as_number(), Some(3.5));
        assert_eq!(Value::text("c").as_number(), None);
        assert_eq!(Value::text("inf").as_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(4.0).to_string(), "4");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::text("Eb4").to_string(), "Eb4");
    }

    #[test]
    fn test_json() {
        let v: Value = serde_json::from_str("\"c3\"").unwrap();
        assert_eq!(v, Value::text("c3"));
        let v: Value = serde_json::from_str("7").unwrap();
        assert_eq!(v, Value::Number(7.0));
    }
}
