//! Evaluation results

use crate::token::{ErrorCode, Number};
use std::fmt;

/// The value a formula evaluates to
///
/// Error results are ordinary values here: they display as the canonical
/// error string and compare equal to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Omitted value
    Empty,
    /// Boolean value (TRUE/FALSE)
    Logical(bool),
    /// Numeric value
    Number(Number),
    /// Text value
    Text(String),
    /// Error value (#VALUE!, #DIV/0!, etc.)
    Error(ErrorCode),
}

impl Scalar {
    /// Check if the result is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Scalar::Error(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Empty => write!(f, ""),
            Scalar::Logical(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Error(e) => write!(f, "{}", e),
        }
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        match self {
            Scalar::Text(s) => s == other,
            Scalar::Error(e) => e.as_str() == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<bool> for Scalar {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Scalar::Logical(b) if b == other)
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Scalar::Number(n) if *n == Number::Int(*other))
    }
}

impl PartialEq<i32> for Scalar {
    fn eq(&self, other: &i32) -> bool {
        *self == *other as i64
    }
}

impl PartialEq<f64> for Scalar {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Scalar::Number(n) if *n == Number::Float(*other))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Empty => serializer.serialize_none(),
            Scalar::Logical(b) => serializer.serialize_bool(*b),
            Scalar::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Scalar::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Error(e) => serializer.serialize_str(e.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_compares_as_canonical_string() {
        let result = Scalar::Error(ErrorCode::ZeroDiv);
        assert_eq!(result, "#DIV/0!");
        assert_eq!(result.to_string(), "#DIV/0!");
        assert!(result.is_error());
    }

    #[test]
    fn test_numeric_comparisons() {
        assert_eq!(Scalar::Number(Number::Int(3)), 3);
        assert_eq!(Scalar::Number(Number::Float(36.0)), 36);
        assert_eq!(Scalar::Number(Number::Float(0.25)), 0.25);
        assert_ne!(Scalar::Text("1".into()), 1);
    }

    #[test]
    fn test_logical_comparisons() {
        assert_eq!(Scalar::Logical(false), false);
        assert_ne!(Scalar::Number(Number::Int(0)), false);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&vec![
            Scalar::Number(Number::Int(3)),
            Scalar::Error(ErrorCode::Na),
            Scalar::Empty,
            Scalar::Logical(true),
        ])
        .unwrap();
        assert_eq!(json, r##"[3,"#N/A",null,true]"##);
    }
}
