//! Formula evaluator
//!
//! An [`Evaluator`] owns a parsed [`RpnProgram`] together with snapshots of
//! the operator and function registries it was built with, and executes the
//! program on a value stack once per call.

use crate::error::{EvaluationError, EvaluationResult, SyntaxResult};
use crate::functions::{ArgSlot, FunctionRegistry};
use crate::operators::OperatorRegistry;
use crate::parser::parse;
use crate::program::{RpnItem, RpnProgram};
use ahash::AHashMap;
use cellcalc_core::{ErrorCode, Scalar, Token};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use tracing::trace;

/// Named input values, looked up by exact name
///
/// Presence is all that matters: a bound `FALSE` or `0` is a valid input.
pub trait InputSource {
    /// Value bound to `name`, if any
    fn get_input(&self, name: &str) -> Option<&Token>;
}

impl<K, S> InputSource for HashMap<K, Token, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn get_input(&self, name: &str) -> Option<&Token> {
        self.get(name)
    }
}

impl<K> InputSource for AHashMap<K, Token>
where
    K: Borrow<str> + Hash + Eq,
{
    fn get_input(&self, name: &str) -> Option<&Token> {
        self.get(name)
    }
}

impl<K> InputSource for BTreeMap<K, Token>
where
    K: Borrow<str> + Ord,
{
    fn get_input(&self, name: &str) -> Option<&Token> {
        self.get(name)
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn get_input(&self, name: &str) -> Option<&Token> {
        (**self).get_input(name)
    }
}

/// Build an evaluator with the built-in registries
///
/// Returns `Ok(None)` only when no token sequence was given.
///
/// # Example
/// ```rust
/// use cellcalc_core::Token;
/// use cellcalc_formula::interpreter;
/// use std::collections::HashMap;
///
/// let tokens = vec![Token::from(1), Token::infix("+"), Token::from(2)];
/// let evaluator = interpreter(Some(tokens)).unwrap().unwrap();
/// let inputs: HashMap<String, Token> = HashMap::new();
/// assert_eq!(evaluator.evaluate(&inputs).unwrap(), 3);
/// ```
pub fn interpreter<I>(tokens: Option<I>) -> SyntaxResult<Option<Evaluator>>
where
    I: IntoIterator<Item = Token>,
{
    interpreter_with(
        tokens,
        OperatorRegistry::builtin(),
        FunctionRegistry::builtin(),
    )
}

/// Build an evaluator with custom registries
///
/// The registries are copied; changing them afterwards does not affect the
/// returned evaluator.
pub fn interpreter_with<I>(
    tokens: Option<I>,
    operators: &OperatorRegistry,
    functions: &FunctionRegistry,
) -> SyntaxResult<Option<Evaluator>>
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .map(|tokens| Evaluator::new(tokens, operators, functions))
        .transpose()
}

/// A parsed formula, ready to evaluate against any number of inputs
#[derive(Debug, Clone)]
pub struct Evaluator {
    program: RpnProgram,
    operators: OperatorRegistry,
    functions: FunctionRegistry,
}

impl Evaluator {
    /// Parse `tokens` and snapshot both registries
    pub fn new<I>(
        tokens: I,
        operators: &OperatorRegistry,
        functions: &FunctionRegistry,
    ) -> SyntaxResult<Self>
    where
        I: IntoIterator<Item = Token>,
    {
        let program = parse(tokens, functions)?;
        Ok(Self {
            program,
            operators: operators.clone(),
            functions: functions.clone(),
        })
    }

    /// The parsed program
    pub fn program(&self) -> &RpnProgram {
        &self.program
    }

    /// Names the program reads from its inputs, sorted
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> {
        self.program.required_inputs()
    }

    /// Evaluate to a scalar result
    pub fn evaluate<S: InputSource + ?Sized>(&self, inputs: &S) -> EvaluationResult<Scalar> {
        let token = self.evaluate_token(inputs)?;
        token
            .to_scalar()
            .ok_or_else(|| EvaluationError::NotAValue {
                token: token.to_string(),
            })
    }

    /// Evaluate to the final token, keeping error diagnostics
    pub fn evaluate_token<S: InputSource + ?Sized>(&self, inputs: &S) -> EvaluationResult<Token> {
        let mut stack: Vec<Token> = Vec::with_capacity(self.program.len());

        for item in &self.program {
            trace!(item = %item, depth = stack.len(), "exec");
            match item {
                RpnItem::Operand(token) => stack.push(token.clone()),
                RpnItem::Range(name) => {
                    let value = inputs.get_input(name.as_str()).ok_or_else(|| {
                        EvaluationError::MissingInput {
                            name: name.as_str().to_string(),
                        }
                    })?;
                    stack.push(value.clone());
                }
                RpnItem::Infix(symbol) => {
                    let args = pop_n(&mut stack, 2, symbol.as_str())?;
                    let (a, b) = (&args[0], &args[1]);
                    let result = if symbol.as_str() == "/" && is_zero_divisor(b) {
                        Token::error(ErrorCode::ZeroDiv, "Division by zero")
                    } else {
                        let op = self.operators.get(symbol.as_str()).ok_or_else(|| {
                            EvaluationError::UndefinedOperator {
                                symbol: symbol.as_str().to_string(),
                            }
                        })?;
                        op(a, b)
                    };
                    stack.push(result);
                }
                RpnItem::Prefix(symbol) => {
                    let args = pop_n(&mut stack, 1, symbol.as_str())?;
                    let op = self.operators.get_prefix(symbol.as_str()).ok_or_else(|| {
                        EvaluationError::UndefinedOperator {
                            symbol: symbol.as_str().to_string(),
                        }
                    })?;
                    stack.push(op(&args[0]));
                }
                RpnItem::Call { name, argc } => {
                    let result = self.call(name.as_str(), *argc, &mut stack)?;
                    stack.push(result);
                }
            }
        }

        match stack.len() {
            0 => Err(EvaluationError::NoValue),
            1 => stack.pop().ok_or(EvaluationError::NoValue),
            _ => Err(EvaluationError::TooManyValues),
        }
    }

    fn call(&self, name: &str, argc: usize, stack: &mut Vec<Token>) -> EvaluationResult<Token> {
        let def = self
            .functions
            .get(name)
            .ok_or_else(|| EvaluationError::UndefinedFunction {
                name: name.to_string(),
            })?;
        let args = pop_n(stack, argc, name)?;

        let args = match &def.slots {
            None => args,
            Some(slots) => resolve_args(name, slots, args)?,
        };
        Ok(def.call(&args))
    }
}

/// `/` short-circuits to `#DIV/0!` on a numeric zero divisor, whatever the dividend
fn is_zero_divisor(b: &Token) -> bool {
    matches!(b, Token::Number(n) if n.is_zero())
}

/// Pop the top `n` values, oldest first
fn pop_n(stack: &mut Vec<Token>, n: usize, operation: &str) -> EvaluationResult<Vec<Token>> {
    if stack.len() < n {
        return Err(EvaluationError::NotEnoughValues {
            operation: operation.to_string(),
        });
    }
    Ok(stack.split_off(stack.len() - n))
}

/// Fill each declared slot from the supplied values, falling back to the
/// slot default where the value was omitted
fn resolve_args(name: &str, slots: &[ArgSlot], supplied: Vec<Token>) -> EvaluationResult<Vec<Token>> {
    let mut supplied = supplied.into_iter();
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let value = supplied.next().filter(|token| !token.is_empty());
            match (value, slot.default_value()) {
                (Some(token), _) => Ok(token),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(EvaluationError::MissingArgument {
                    function: name.to_string(),
                    index,
                }),
            }
        })
        .collect()
}
