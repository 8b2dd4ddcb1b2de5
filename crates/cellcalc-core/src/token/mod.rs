//! Formula tokens
//!
//! This module contains:
//! - [`Token`] - The closed set of tokens an upstream tokenizer delivers
//! - [`Number`] - Integer-or-float numeric operands
//! - [`ErrorCode`] and [`ErrorValue`] - The spreadsheet error taxonomy
//! - [`SharedString`] - Cheaply clonable token payload text

mod error;
mod number;
#[cfg(feature = "serde")]
mod raw;
mod shared;

pub use error::{ErrorCode, ErrorValue};
pub use number::Number;
#[cfg(feature = "serde")]
pub use raw::RawToken;
pub use shared::SharedString;

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use std::fmt;

/// Token type names, as delivered by the tokenizer
pub mod kind {
    pub const OPERAND: &str = "OPERAND";
    pub const FUNC: &str = "FUNC";
    pub const OPERATOR_INFIX: &str = "OPERATOR-INFIX";
    pub const OPERATOR_PREFIX: &str = "OPERATOR-PREFIX";
    pub const PAREN: &str = "PAREN";
    pub const SEP: &str = "SEP";
    pub const WHITE_SPACE: &str = "WHITE-SPACE";
}

/// Token subtype names, as delivered by the tokenizer
pub mod subtype {
    pub const LOGICAL: &str = "LOGICAL";
    pub const TEXT: &str = "TEXT";
    pub const NUMBER: &str = "NUMBER";
    pub const RANGE: &str = "RANGE";
    pub const ERROR: &str = "ERROR";
    pub const EMPTY: &str = "EMPTY";
    pub const OPEN: &str = "OPEN";
    pub const CLOSE: &str = "CLOSE";
    pub const ARG: &str = "ARG";
    pub const NONE: &str = "";
}

/// A formula token
///
/// Operand variants carry values through evaluation; the remaining variants
/// only drive parsing. Tokens are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Operands ===
    /// OPERAND/LOGICAL
    Logical(bool),
    /// OPERAND/TEXT
    Text(SharedString),
    /// OPERAND/NUMBER
    Number(Number),
    /// OPERAND/RANGE - a named input resolved at evaluation time
    Range(SharedString),
    /// OPERAND/ERROR
    Error(ErrorValue),
    /// OPERAND/EMPTY - an omitted argument
    Empty,

    // === Structure ===
    /// FUNC/OPEN - function name including the trailing `(`
    FuncOpen(SharedString),
    /// FUNC/CLOSE
    FuncClose,
    /// OPERATOR-INFIX - binary operator symbol
    Infix(SharedString),
    /// OPERATOR-PREFIX - unary operator symbol
    Prefix(SharedString),
    /// PAREN/OPEN
    ParenOpen,
    /// PAREN/CLOSE
    ParenClose,
    /// SEP/ARG - argument separator
    Separator(SharedString),
    /// WHITE-SPACE
    Whitespace(SharedString),

    /// Any (type, subtype) pair outside the vocabulary above
    Unrecognized {
        kind: SharedString,
        subtype: SharedString,
        value: SharedString,
    },
}

impl Token {
    /// Create a text operand
    pub fn text<S: AsRef<str>>(s: S) -> Self {
        Token::Text(SharedString::new(s))
    }

    /// Create a numeric operand
    pub fn number<N: Into<Number>>(n: N) -> Self {
        Token::Number(n.into())
    }

    /// Create a range operand
    pub fn range<S: AsRef<str>>(name: S) -> Self {
        Token::Range(SharedString::new(name))
    }

    /// Create an error operand
    pub fn error<S: AsRef<str>>(code: ErrorCode, message: S) -> Self {
        Token::Error(ErrorValue::new(code, message))
    }

    /// Create a function-open token (`name` includes the trailing `(`)
    pub fn func<S: AsRef<str>>(name: S) -> Self {
        Token::FuncOpen(SharedString::new(name))
    }

    /// Create an infix operator token
    pub fn infix<S: AsRef<str>>(symbol: S) -> Self {
        Token::Infix(SharedString::new(symbol))
    }

    /// Create a prefix operator token
    pub fn prefix<S: AsRef<str>>(symbol: S) -> Self {
        Token::Prefix(SharedString::new(symbol))
    }

    /// Create a `,` argument separator
    pub fn separator() -> Self {
        Token::Separator(SharedString::new(","))
    }

    /// Create a white-space token
    pub fn whitespace<S: AsRef<str>>(s: S) -> Self {
        Token::Whitespace(SharedString::new(s))
    }

    /// Create a token outside the known vocabulary
    pub fn unrecognized<K, S, V>(kind: K, subtype: S, value: V) -> Self
    where
        K: AsRef<str>,
        S: AsRef<str>,
        V: AsRef<str>,
    {
        Token::Unrecognized {
            kind: SharedString::new(kind),
            subtype: SharedString::new(subtype),
            value: SharedString::new(value),
        }
    }

    /// Build a token from the tokenizer's textual (type, subtype, value) triple
    ///
    /// Numbers, logicals and error codes are parsed from `value`; quoted text
    /// has its quotes removed. Unknown pairs become [`Token::Unrecognized`] so
    /// the parser can report them with their position.
    pub fn from_parts(kind: &str, subtype: &str, value: &str) -> Result<Self> {
        let invalid = |expected: &'static str| Error::InvalidTokenValue {
            kind: kind.to_string(),
            subtype: subtype.to_string(),
            expected,
            actual: value.to_string(),
        };

        let token = match (kind, subtype) {
            (kind::OPERAND, subtype::LOGICAL) => match value.to_uppercase().as_str() {
                "TRUE" => Token::Logical(true),
                "FALSE" => Token::Logical(false),
                _ => return Err(invalid("TRUE or FALSE")),
            },
            (kind::OPERAND, subtype::TEXT) => Token::text(unquote(value)),
            (kind::OPERAND, subtype::NUMBER) => {
                Token::Number(parse_number(value).ok_or_else(|| invalid("a number"))?)
            }
            (kind::OPERAND, subtype::RANGE) => Token::range(value),
            (kind::OPERAND, subtype::ERROR) => {
                let code = ErrorCode::parse(value)
                    .ok_or_else(|| Error::InvalidErrorCode(value.to_string()))?;
                Token::error(code, "")
            }
            (kind::OPERAND, subtype::EMPTY) => Token::Empty,
            (kind::FUNC, subtype::OPEN) => Token::func(value),
            (kind::FUNC, subtype::CLOSE) => Token::FuncClose,
            // Some tokenizers tag parentheses as infix operators
            (kind::PAREN | kind::OPERATOR_INFIX, subtype::OPEN) => Token::ParenOpen,
            (kind::PAREN | kind::OPERATOR_INFIX, subtype::CLOSE) => Token::ParenClose,
            (kind::OPERATOR_INFIX, _) => Token::infix(value),
            (kind::OPERATOR_PREFIX, _) => Token::prefix(value),
            (kind::SEP, subtype::ARG) => Token::Separator(SharedString::new(value)),
            (kind::WHITE_SPACE, _) => Token::whitespace(value),
            _ => Token::unrecognized(kind, subtype, value),
        };
        Ok(token)
    }

    /// The token type name (e.g. `OPERAND`, `OPERATOR-INFIX`)
    pub fn kind(&self) -> &str {
        match self {
            Token::Logical(_)
            | Token::Text(_)
            | Token::Number(_)
            | Token::Range(_)
            | Token::Error(_)
            | Token::Empty => kind::OPERAND,
            Token::FuncOpen(_) | Token::FuncClose => kind::FUNC,
            Token::Infix(_) => kind::OPERATOR_INFIX,
            Token::Prefix(_) => kind::OPERATOR_PREFIX,
            Token::ParenOpen | Token::ParenClose => kind::PAREN,
            Token::Separator(_) => kind::SEP,
            Token::Whitespace(_) => kind::WHITE_SPACE,
            Token::Unrecognized { kind, .. } => kind.as_str(),
        }
    }

    /// The token subtype name (e.g. `NUMBER`, `OPEN`, or empty)
    pub fn subtype(&self) -> &str {
        match self {
            Token::Logical(_) => subtype::LOGICAL,
            Token::Text(_) => subtype::TEXT,
            Token::Number(_) => subtype::NUMBER,
            Token::Range(_) => subtype::RANGE,
            Token::Error(_) => subtype::ERROR,
            Token::Empty => subtype::EMPTY,
            Token::FuncOpen(_) | Token::ParenOpen => subtype::OPEN,
            Token::FuncClose | Token::ParenClose => subtype::CLOSE,
            Token::Separator(_) => subtype::ARG,
            Token::Infix(_) | Token::Prefix(_) | Token::Whitespace(_) => subtype::NONE,
            Token::Unrecognized { subtype, .. } => subtype.as_str(),
        }
    }

    /// Check if this token is an operand (carries a value)
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Token::Logical(_)
                | Token::Text(_)
                | Token::Number(_)
                | Token::Range(_)
                | Token::Error(_)
                | Token::Empty
        )
    }

    /// Check if this is an error operand
    pub fn is_error(&self) -> bool {
        matches!(self, Token::Error(_))
    }

    /// Check if this is an omitted-argument marker
    pub fn is_empty(&self) -> bool {
        matches!(self, Token::Empty)
    }

    /// Get the number if this is a numeric operand
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Token::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean if this is a logical operand
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Token::Logical(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the error if this is an error operand
    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Token::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Text form of a value operand: `TRUE`/`FALSE`, numbers without a
    /// trailing `.0`, text unchanged. `None` for every other token.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Token::Logical(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Token::Number(n) => Some(n.to_string()),
            Token::Text(s) => Some(s.as_str().to_string()),
            _ => None,
        }
    }

    /// Operator-context equality: same subtype and same value
    ///
    /// Numbers compare numerically across integer and float, errors by code.
    pub fn same_value(&self, other: &Token) -> bool {
        match (self, other) {
            (Token::Logical(a), Token::Logical(b)) => a == b,
            (Token::Text(a), Token::Text(b)) => a == b,
            (Token::Number(a), Token::Number(b)) => a == b,
            (Token::Range(a), Token::Range(b)) => a == b,
            (Token::Error(a), Token::Error(b)) => a.code() == b.code(),
            (Token::Empty, Token::Empty) => true,
            _ => false,
        }
    }

    /// The externally visible value of an operand token
    ///
    /// Errors become their canonical code; non-operands and unresolved
    /// ranges have no scalar value.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Token::Logical(b) => Some(Scalar::Logical(*b)),
            Token::Text(s) => Some(Scalar::Text(s.as_str().to_string())),
            Token::Number(n) => Some(Scalar::Number(*n)),
            Token::Error(e) => Some(Scalar::Error(e.code())),
            Token::Empty => Some(Scalar::Empty),
            _ => None,
        }
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Logical(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Token::Number(n) => write!(f, "{}", n),
            Token::Error(e) => write!(f, "{}", e.code()),
            Token::Empty => Ok(()),
            Token::Text(s)
            | Token::Range(s)
            | Token::FuncOpen(s)
            | Token::Infix(s)
            | Token::Prefix(s)
            | Token::Separator(s)
            | Token::Whitespace(s) => write!(f, "{}", s),
            Token::FuncClose | Token::ParenClose => write!(f, ")"),
            Token::ParenOpen => write!(f, "("),
            Token::Unrecognized { value, .. } => write!(f, "{}", value),
        }
    }
}

/// Diagnostic rendering used in parser messages: `Token<v:+ t:OPERATOR-INFIX s: >`
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token<v:")?;
        self.fmt_value(f)?;
        write!(f, " t:{} s:{} >", self.kind(), self.subtype())
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Logical(b)
    }
}

impl From<i64> for Token {
    fn from(n: i64) -> Self {
        Token::Number(Number::Int(n))
    }
}

impl From<i32> for Token {
    fn from(n: i32) -> Self {
        Token::Number(Number::Int(n as i64))
    }
}

impl From<f64> for Token {
    fn from(n: f64) -> Self {
        Token::Number(Number::Float(n))
    }
}

impl From<Number> for Token {
    fn from(n: Number) -> Self {
        Token::Number(n)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::text(s)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(SharedString::from(s))
    }
}

impl From<ErrorValue> for Token {
    fn from(e: ErrorValue) -> Self {
        Token::Error(e)
    }
}

/// Strip surrounding double quotes and collapse `""` escapes
fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

fn parse_number(value: &str) -> Option<Number> {
    let value = value.trim();
    if let Ok(i) = value.parse::<i64>() {
        return Some(Number::Int(i));
    }
    value.parse::<f64>().ok().map(Number::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operand_kinds() {
        assert_eq!(Token::from(true).kind(), "OPERAND");
        assert_eq!(Token::from(true).subtype(), "LOGICAL");
        assert_eq!(Token::text("hi").subtype(), "TEXT");
        assert_eq!(Token::from(1).subtype(), "NUMBER");
        assert_eq!(Token::range("F7").subtype(), "RANGE");
        assert_eq!(Token::error(ErrorCode::Ref, "x").subtype(), "ERROR");
        assert_eq!(Token::Empty.subtype(), "EMPTY");
        assert!(Token::Empty.is_operand());
        assert!(!Token::ParenOpen.is_operand());
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Token::infix("+").to_string(), "Token<v:+ t:OPERATOR-INFIX s: >");
        assert_eq!(Token::separator().to_string(), "Token<v:, t:SEP s:ARG >");
        assert_eq!(
            Token::unrecognized("OPERATOR", "", "XX").to_string(),
            "Token<v:XX t:OPERATOR s: >"
        );
        assert_eq!(Token::func("NOT(").to_string(), "Token<v:NOT( t:FUNC s:OPEN >");
    }

    #[test]
    fn test_error_display_is_canonical() {
        let token = Token::error(ErrorCode::GettingData, "As expected");
        assert_eq!(token.to_string(), "Token<v:#GETTING_DATA t:OPERAND s:ERROR >");
        assert_eq!(token.as_error().map(|e| e.message()), Some("As expected"));
    }

    #[test]
    fn test_same_value() {
        assert!(Token::from(1).same_value(&Token::from(1.0)));
        assert!(!Token::from(1).same_value(&Token::text("1")));
        assert!(!Token::from(true).same_value(&Token::from(1)));
        assert!(Token::error(ErrorCode::Na, "a").same_value(&Token::error(ErrorCode::Na, "b")));
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Token::from(12345).as_text().as_deref(), Some("12345"));
        assert_eq!(Token::from(true).as_text().as_deref(), Some("TRUE"));
        assert_eq!(Token::from(false).as_text().as_deref(), Some("FALSE"));
        assert_eq!(Token::range("A1").as_text(), None);
        assert_eq!(Token::Empty.as_text(), None);
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            Token::from_parts("OPERAND", "NUMBER", "42").unwrap(),
            Token::Number(Number::Int(42))
        );
        assert_eq!(
            Token::from_parts("OPERAND", "NUMBER", "2.5").unwrap(),
            Token::Number(Number::Float(2.5))
        );
        assert_eq!(
            Token::from_parts("OPERAND", "TEXT", "\"say \"\"hi\"\"\"").unwrap(),
            Token::text("say \"hi\"")
        );
        assert_eq!(
            Token::from_parts("OPERAND", "LOGICAL", "true").unwrap(),
            Token::Logical(true)
        );
        assert_eq!(
            Token::from_parts("OPERATOR-INFIX", "OPEN", "(").unwrap(),
            Token::ParenOpen
        );
        assert_eq!(Token::from_parts("FUNC", "CLOSE", ")").unwrap(), Token::FuncClose);
        assert!(matches!(
            Token::from_parts("OPERATOR", "", "XX").unwrap(),
            Token::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_from_parts_invalid_payloads() {
        assert!(matches!(
            Token::from_parts("OPERAND", "NUMBER", "abc"),
            Err(Error::InvalidTokenValue { .. })
        ));
        assert!(matches!(
            Token::from_parts("OPERAND", "ERROR", "#OOPS!"),
            Err(Error::InvalidErrorCode(_))
        ));
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(Token::from(false).to_scalar(), Some(Scalar::Logical(false)));
        assert_eq!(
            Token::error(ErrorCode::ZeroDiv, "x").to_scalar(),
            Some(Scalar::Error(ErrorCode::ZeroDiv))
        );
        assert_eq!(Token::range("F7").to_scalar(), None);
        assert_eq!(Token::Infix("+".into()).to_scalar(), None);
    }
}
