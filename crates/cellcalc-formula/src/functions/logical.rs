//! Logical functions

use super::arg;
use cellcalc_core::{ErrorCode, Token};

/// NOT(logical)
pub fn fn_not(args: &[Token]) -> Token {
    match arg(args, 0) {
        Token::Logical(b) => Token::Logical(!b),
        Token::Number(n) => Token::Logical(n.is_zero()),
        err @ Token::Error(_) => err.clone(),
        other => Token::error(
            ErrorCode::Value,
            format!(
                "Expected boolean or number but '{}' was found",
                other.subtype()
            ),
        ),
    }
}

/// ISERROR(value)
pub fn fn_iserror(args: &[Token]) -> Token {
    Token::Logical(arg(args, 0).is_error())
}
