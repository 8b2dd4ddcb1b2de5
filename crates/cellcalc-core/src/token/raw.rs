//! JSON token interchange
//!
//! Tokenizers outside Rust hand over tokens as JSON objects:
//!
//! ```json
//! [{"type": "OPERAND", "subtype": "NUMBER", "value": 1},
//!  {"type": "OPERATOR-INFIX", "value": "+"},
//!  {"type": "OPERAND", "subtype": "RANGE", "value": "F7"}]
//! ```

use super::{kind, subtype, Number, Token};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// A token as it appears in interchange data, before classification
#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawToken {
    /// Classify into a [`Token`]
    pub fn into_token(self) -> Result<Token> {
        let invalid = |expected: &'static str, value: &Value| Error::InvalidTokenValue {
            kind: self.kind.clone(),
            subtype: self.subtype.clone(),
            expected,
            actual: value.to_string(),
        };

        if self.kind == kind::OPERAND {
            match (self.subtype.as_str(), &self.value) {
                (subtype::NUMBER, Value::Number(n)) => {
                    let number = match n.as_i64() {
                        Some(i) => Number::Int(i),
                        None => Number::Float(
                            n.as_f64().ok_or_else(|| invalid("a number", &self.value))?,
                        ),
                    };
                    return Ok(Token::Number(number));
                }
                (subtype::LOGICAL, Value::Bool(b)) => return Ok(Token::Logical(*b)),
                (subtype::EMPTY, _) => return Ok(Token::Empty),
                (subtype::ERROR, Value::String(code)) => {
                    let token = Token::from_parts(&self.kind, &self.subtype, code)?;
                    return Ok(match (token, &self.message) {
                        (Token::Error(e), Some(message)) => Token::error(e.code(), message),
                        (token, _) => token,
                    });
                }
                // Raw JSON strings are already unquoted text
                (subtype::TEXT, Value::String(s)) => return Ok(Token::text(s)),
                _ => {}
            }
        }

        match &self.value {
            Value::String(s) => Token::from_parts(&self.kind, &self.subtype, s),
            Value::Null => Token::from_parts(&self.kind, &self.subtype, ""),
            Value::Number(n) => Token::from_parts(&self.kind, &self.subtype, &n.to_string()),
            Value::Bool(b) => {
                Token::from_parts(&self.kind, &self.subtype, if *b { "TRUE" } else { "FALSE" })
            }
            other => Err(invalid("a scalar", other)),
        }
    }
}

impl Token {
    /// Decode a JSON array of interchange tokens
    pub fn list_from_json(json: &str) -> Result<Vec<Token>> {
        let raw: Vec<RawToken> =
            serde_json::from_str(json).map_err(|e| Error::Decode(e.to_string()))?;
        raw.into_iter().map(RawToken::into_token).collect()
    }

    /// Decode a single interchange token
    pub fn from_json_value(value: Value) -> Result<Token> {
        let raw: RawToken =
            serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))?;
        raw.into_token()
    }
}
