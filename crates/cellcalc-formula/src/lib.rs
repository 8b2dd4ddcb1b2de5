//! # cellcalc-formula
//!
//! Formula parser and evaluator for cellcalc.
//!
//! This crate provides:
//! - Formula parsing (infix tokens → RPN program)
//! - Formula evaluation (RPN program + named inputs → value)
//! - Extensible operator and function registries with built-in defaults
//!
//! Ordinary spreadsheet failures travel as error values (`#DIV/0!`,
//! `#VALUE!`, ...); malformed formulas fail construction with a
//! [`SyntaxError`], and contract violations at run time with an
//! [`EvaluationError`].
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::Token;
//! use cellcalc_formula::interpreter;
//! use std::collections::HashMap;
//!
//! // (F7 + 1) / 0
//! let tokens = vec![
//!     Token::ParenOpen,
//!     Token::range("F7"),
//!     Token::infix("+"),
//!     Token::from(1),
//!     Token::ParenClose,
//!     Token::infix("/"),
//!     Token::from(0),
//! ];
//! let evaluator = interpreter(Some(tokens))?.expect("tokens were given");
//! assert_eq!(evaluator.required_inputs().collect::<Vec<_>>(), vec!["F7"]);
//!
//! let inputs = HashMap::from([("F7", Token::from(41))]);
//! assert_eq!(evaluator.evaluate(&inputs)?, "#DIV/0!");
//! # Ok::<(), cellcalc_formula::FormulaError>(())
//! ```

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod operators;
pub mod parser;
pub mod program;

pub use error::{
    EvaluationError, EvaluationResult, FormulaError, FormulaResult, SyntaxError, SyntaxResult,
};
pub use evaluator::{interpreter, interpreter_with, Evaluator, InputSource};
pub use functions::{ArgSlot, FunctionDef, FunctionImpl, FunctionRegistry};
pub use operators::{numeric, numeric_prefix, InfixFn, OperatorRegistry, PrefixFn};
pub use parser::parse;
pub use program::{RpnItem, RpnProgram};
