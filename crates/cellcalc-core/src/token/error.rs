//! Spreadsheet error values

use std::fmt;
use std::sync::Arc;

/// Excel error codes
///
/// The set is closed: every error token displays as one of these eight strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    ZeroDiv,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid reference or operand
    Ref,
    /// #NAME? - Unrecognized name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
}

impl ErrorCode {
    /// All codes, in declaration order
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::Null,
        ErrorCode::ZeroDiv,
        ErrorCode::Value,
        ErrorCode::Ref,
        ErrorCode::Name,
        ErrorCode::Num,
        ErrorCode::Na,
        ErrorCode::GettingData,
    ];

    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::ZeroDiv => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::Na => "#N/A",
            ErrorCode::GettingData => "#GETTING_DATA",
        }
    }

    /// Parse a canonical error string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NULL!" => Some(ErrorCode::Null),
            "#DIV/0!" => Some(ErrorCode::ZeroDiv),
            "#VALUE!" => Some(ErrorCode::Value),
            "#REF!" => Some(ErrorCode::Ref),
            "#NAME?" => Some(ErrorCode::Name),
            "#NUM!" => Some(ErrorCode::Num),
            "#N/A" => Some(ErrorCode::Na),
            "#GETTING_DATA" => Some(ErrorCode::GettingData),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error value carried through the data path, with a diagnostic message
///
/// Clones share the message allocation, so an error returned unchanged by an
/// operator is the same instance that went in (see [`ErrorValue::same_instance`]).
#[derive(Debug, Clone)]
pub struct ErrorValue {
    code: ErrorCode,
    message: Arc<str>,
}

impl ErrorValue {
    /// Create a new error value
    pub fn new<S: AsRef<str>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: Arc::from(message.as_ref()),
        }
    }

    /// The canonical error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The free-text diagnostic (never part of the displayed value)
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if both values originate from the same construction
    pub fn same_instance(&self, other: &ErrorValue) -> bool {
        self.code == other.code && Arc::ptr_eq(&self.message, &other.message)
    }
}

/// Errors compare by code only; the diagnostic does not participate.
impl PartialEq for ErrorValue {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
