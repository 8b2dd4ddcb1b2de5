//! Error types for cellcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building tokens from external data
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown canonical error string (e.g. "#OOPS!")
    #[error("Invalid error code: {0}")]
    InvalidErrorCode(String),

    /// Token payload does not match its (type, subtype)
    #[error("Invalid value for {kind}/{subtype} token: expected {expected}, got {actual}")]
    InvalidTokenValue {
        kind: String,
        subtype: String,
        expected: &'static str,
        actual: String,
    },

    /// Token interchange data could not be decoded
    #[error("Token decode error: {0}")]
    Decode(String),
}
