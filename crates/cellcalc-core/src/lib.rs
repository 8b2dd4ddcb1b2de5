//! # cellcalc-core
//!
//! Core value types for the cellcalc formula interpreter.
//!
//! This crate provides the fundamental types used throughout cellcalc:
//! - [`Token`] - Tokens delivered by an upstream formula tokenizer
//! - [`ErrorCode`] and [`ErrorValue`] - The eight spreadsheet error values
//! - [`Number`] - Numeric operands with integer/float identity
//! - [`Scalar`] - The value a formula evaluates to
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{ErrorCode, Scalar, Token};
//!
//! let token = Token::error(ErrorCode::ZeroDiv, "divided by zero");
//! assert_eq!(token.to_scalar(), Some(Scalar::Error(ErrorCode::ZeroDiv)));
//! assert_eq!(Token::infix("+").to_string(), "Token<v:+ t:OPERATOR-INFIX s: >");
//! ```
//!
//! With the `serde` feature, tokens can be decoded from JSON
//! (see [`RawToken`]) and scalars serialized.

pub mod error;
pub mod scalar;
pub mod token;

// Re-exports for convenience
pub use error::{Error, Result};
pub use scalar::Scalar;
#[cfg(feature = "serde")]
pub use token::RawToken;
pub use token::{ErrorCode, ErrorValue, Number, SharedString, Token};
