//! Formula error types
//!
//! Two disjoint channels: [`SyntaxError`] aborts interpreter construction,
//! [`EvaluationError`] aborts a single evaluation when the program or its
//! inputs violate the calling contract. Ordinary spreadsheet failures
//! (`#DIV/0!`, `#VALUE!`, ...) are values and never show up here.

use thiserror::Error;

/// Result type for formula parsing
pub type SyntaxResult<T> = std::result::Result<T, SyntaxError>;

/// Result type for formula evaluation
pub type EvaluationResult<T> = std::result::Result<T, EvaluationError>;

/// Result type for callers handling both channels
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Malformed token sequences, detected while building the RPN program
///
/// Positions are indexes into the original token sequence, white-space included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// Infix operator with no left operand
    #[error("Unexpected operator `{token}` at position {position}.")]
    UnexpectedOperator { token: String, position: usize },

    /// Function name missing from the function registry
    #[error("Unknown function `{name}` at position {position}.")]
    UnknownFunction { name: String, position: usize },

    /// `(` directly after an operand
    #[error("Missing operator before '(' at position {position}.")]
    MissingOperator { position: usize },

    /// `)` with no matching `(`
    #[error("Unexpected `)` at position {position} (too many closing parentheses).")]
    UnexpectedClose { position: usize },

    /// `(` never closed
    #[error("Unmatched `(` (missing closing parenthesis).")]
    UnmatchedOpen,

    /// Token outside the dispatchable vocabulary
    #[error("Unrecognized token `{token}` at position {position}.")]
    UnrecognizedToken { token: String, position: usize },

    /// Argument separator outside a function call
    #[error("Unexpected separator `{token}` at position {position}.")]
    UnexpectedSeparator { token: String, position: usize },

    /// More arguments than declared slots
    #[error("Function `{function}` expects {expected} arguments but got {actual}.")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Empty call of a function whose first argument is required
    #[error("Missing required argument at {index} for function `{function}`")]
    MissingArgument { function: String, index: usize },
}

/// Contract violations detected while executing an RPN program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// Range operand absent from the input mapping
    #[error("Missing input for range `{name}`.")]
    MissingInput { name: String },

    /// Operator or function found fewer stack values than it consumes
    #[error("Not enough values for operation '{operation}'.")]
    NotEnoughValues { operation: String },

    /// More than one value left on the stack
    #[error("Formula evaluation error: too many values remaining.")]
    TooManyValues,

    /// Nothing left on the stack
    #[error("Formula evaluation error: no value produced.")]
    NoValue,

    /// Final stack value is not an operand
    #[error("Formula evaluation error: `{token}` is not a value.")]
    NotAValue { token: String },

    /// Operator symbol missing from the operator registry
    #[error("Undefined operator '{symbol}'.")]
    UndefinedOperator { symbol: String },

    /// Function missing from the evaluator's function registry
    #[error("Undefined function `{name}`.")]
    UndefinedFunction { name: String },

    /// Required argument omitted at the call site
    #[error("Missing required argument at {index} for function `{function}`")]
    MissingArgument { function: String, index: usize },
}

/// Either failure channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula syntax error
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Formula evaluation error
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SyntaxError::UnexpectedClose { position: 2 };
        assert_eq!(
            err.to_string(),
            "Unexpected `)` at position 2 (too many closing parentheses)."
        );

        let err = SyntaxError::ArgumentCount {
            function: "SEARCH(".into(),
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "Function `SEARCH(` expects 3 arguments but got 4."
        );

        let err = EvaluationError::MissingArgument {
            function: "SEARCH(".into(),
            index: 1,
        };
        assert_eq!(
            err.to_string(),
            "Missing required argument at 1 for function `SEARCH(`"
        );
    }

    #[test]
    fn test_formula_error_is_transparent() {
        let err: FormulaError = EvaluationError::TooManyValues.into();
        assert_eq!(
            err.to_string(),
            "Formula evaluation error: too many values remaining."
        );
    }
}
