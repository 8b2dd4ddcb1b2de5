//! Operator registry and built-in operators
//!
//! Infix operators are `(&Token, &Token) -> Token` functions registered under
//! one or more symbol aliases; prefix operators are `(&Token) -> Token`.
//! Every built-in follows the same boundary contract:
//!
//! 1. An error operand is returned unchanged (left operand first).
//! 2. Two value operands are computed on.
//! 3. Anything else (a non-operand on the stack) becomes `#REF!`.
//!
//! Arithmetic operators go through [`numeric`], which wraps a plain
//! `(Number, Number) -> Number` function in that contract.

use ahash::AHashMap;
use cellcalc_core::{ErrorCode, Number, SharedString, Token};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Binary operator implementation
pub type InfixFn = Arc<dyn Fn(&Token, &Token) -> Token + Send + Sync>;

/// Unary operator implementation
pub type PrefixFn = Arc<dyn Fn(&Token) -> Token + Send + Sync>;

/// Built-in operator table (lazily initialized, never mutated)
static BUILTIN_OPERATORS: Lazy<OperatorRegistry> = Lazy::new(OperatorRegistry::with_builtins);

/// Operator registry
///
/// Cloning is cheap (implementations are reference-counted) and yields an
/// independent table: changes to one clone never reach another.
#[derive(Clone)]
pub struct OperatorRegistry {
    infix: AHashMap<SharedString, InfixFn>,
    prefix: AHashMap<SharedString, PrefixFn>,
}

impl OperatorRegistry {
    /// Create a registry with all built-in operators
    pub fn new() -> Self {
        BUILTIN_OPERATORS.clone()
    }

    /// Create a registry with no operators at all
    pub fn empty() -> Self {
        Self {
            infix: AHashMap::new(),
            prefix: AHashMap::new(),
        }
    }

    /// The shared built-in table
    pub fn builtin() -> &'static OperatorRegistry {
        &BUILTIN_OPERATORS
    }

    fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.register(&["=", "=="], op_eq);
        registry.register(&["<>", "!="], op_neq);
        registry.register(&["<"], op_lt);
        registry.register(&[">"], op_gt);
        registry.register(&["<="], op_le);
        registry.register(&[">="], op_ge);
        registry.register(&["&"], op_concat);
        registry.register(&["+"], numeric(|a, b| a + b));
        registry.register(&["-"], numeric(|a, b| a - b));
        registry.register(&["*"], numeric(|a, b| a * b));
        registry.register(&["/"], op_div);
        registry.register(&["^"], numeric(Number::pow));

        registry.register_prefix(&["-"], numeric_prefix(|n| -n));
        registry.register_prefix(&["+"], numeric_prefix(|n| n));

        registry
    }

    /// Register an infix operator under each of `aliases`
    pub fn register<F>(&mut self, aliases: &[&str], op: F)
    where
        F: Fn(&Token, &Token) -> Token + Send + Sync + 'static,
    {
        let op: InfixFn = Arc::new(op);
        for alias in aliases {
            self.infix.insert(SharedString::new(alias), op.clone());
        }
    }

    /// Register a prefix operator under each of `aliases`
    pub fn register_prefix<F>(&mut self, aliases: &[&str], op: F)
    where
        F: Fn(&Token) -> Token + Send + Sync + 'static,
    {
        let op: PrefixFn = Arc::new(op);
        for alias in aliases {
            self.prefix.insert(SharedString::new(alias), op.clone());
        }
    }

    /// Remove an infix operator, returning whether it was registered
    pub fn unregister(&mut self, symbol: &str) -> bool {
        self.infix.remove(symbol).is_some()
    }

    /// Look up an infix operator
    pub fn get(&self, symbol: &str) -> Option<&InfixFn> {
        self.infix.get(symbol)
    }

    /// Look up a prefix operator
    pub fn get_prefix(&self, symbol: &str) -> Option<&PrefixFn> {
        self.prefix.get(symbol)
    }

    /// Apply an infix operator; `None` if the symbol is not registered
    pub fn apply(&self, symbol: &str, a: &Token, b: &Token) -> Option<Token> {
        self.get(symbol).map(|op| op(a, b))
    }

    /// Registered infix symbols, sorted
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.infix.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefix: Vec<&str> = self.prefix.keys().map(|s| s.as_str()).collect();
        prefix.sort_unstable();
        f.debug_struct("OperatorRegistry")
            .field("infix", &self.symbols())
            .field("prefix", &prefix)
            .finish()
    }
}

// === Boundary contract ===

/// Return the first error operand, left before right
fn propagate(a: &Token, b: &Token) -> Option<Token> {
    if a.is_error() {
        Some(a.clone())
    } else if b.is_error() {
        Some(b.clone())
    } else {
        None
    }
}

/// Neither side is a usable value (e.g. an unresolved or structural token)
fn not_values(a: &Token, b: &Token) -> Token {
    Token::error(
        ErrorCode::Ref,
        format!(
            "Expected 2 values but got {}/{} and {}/{}",
            a.kind(),
            a.subtype(),
            b.kind(),
            b.subtype()
        ),
    )
}

/// Value operands an operator can compute on (Range must be resolved first)
fn is_value(token: &Token) -> bool {
    token.is_operand() && !matches!(token, Token::Range(_))
}

enum Numeric {
    Value(Number),
    /// A value, but not a number (text, omitted)
    Mismatch,
    /// Not a value at all
    Invalid,
}

fn numeric_operand(token: &Token) -> Numeric {
    match token {
        Token::Number(n) => Numeric::Value(*n),
        Token::Logical(b) => Numeric::Value(Number::Int(*b as i64)),
        Token::Text(_) | Token::Empty => Numeric::Mismatch,
        _ => Numeric::Invalid,
    }
}

fn finite(n: Number) -> Token {
    if n.is_finite() {
        Token::Number(n)
    } else {
        Token::error(ErrorCode::Num, "Numeric result out of range")
    }
}

/// Wrap a numeric function in the operator boundary contract
///
/// Logical operands count as `0`/`1`; text or omitted operands give
/// `#VALUE!`; a non-finite result gives `#NUM!`.
pub fn numeric<F>(f: F) -> impl Fn(&Token, &Token) -> Token + Send + Sync + 'static
where
    F: Fn(Number, Number) -> Number + Send + Sync + 'static,
{
    move |a, b| {
        if let Some(err) = propagate(a, b) {
            return err;
        }
        match (numeric_operand(a), numeric_operand(b)) {
            (Numeric::Value(x), Numeric::Value(y)) => finite(f(x, y)),
            (Numeric::Invalid, _) | (_, Numeric::Invalid) => not_values(a, b),
            _ => Token::error(
                ErrorCode::Value,
                format!(
                    "Expected numbers but got {} and {}",
                    a.subtype(),
                    b.subtype()
                ),
            ),
        }
    }
}

/// Prefix counterpart of [`numeric`]
pub fn numeric_prefix<F>(f: F) -> impl Fn(&Token) -> Token + Send + Sync + 'static
where
    F: Fn(Number) -> Number + Send + Sync + 'static,
{
    move |a| match numeric_operand(a) {
        _ if a.is_error() => a.clone(),
        Numeric::Value(x) => finite(f(x)),
        Numeric::Mismatch => Token::error(
            ErrorCode::Value,
            format!("Expected a number but got {}", a.subtype()),
        ),
        Numeric::Invalid => Token::error(
            ErrorCode::Ref,
            format!("Expected a value but got {}/{}", a.kind(), a.subtype()),
        ),
    }
}

// === Built-in operators ===

/// `=` / `==`: same subtype and same value
pub fn op_eq(a: &Token, b: &Token) -> Token {
    if let Some(err) = propagate(a, b) {
        return err;
    }
    if a.is_operand() && b.is_operand() {
        Token::Logical(a.same_value(b))
    } else {
        not_values(a, b)
    }
}

/// `<>` / `!=`: negation of [`op_eq`]; non-logical results pass through
pub fn op_neq(a: &Token, b: &Token) -> Token {
    match op_eq(a, b) {
        Token::Logical(eq) => Token::Logical(!eq),
        other => other,
    }
}

/// `&`: text concatenation
pub fn op_concat(a: &Token, b: &Token) -> Token {
    if let Some(err) = propagate(a, b) {
        return err;
    }
    match (concat_text(a), concat_text(b)) {
        (Some(x), Some(y)) => Token::from(x + &y),
        _ => not_values(a, b),
    }
}

fn concat_text(token: &Token) -> Option<String> {
    match token {
        Token::Empty => Some(String::new()),
        other => other.as_text(),
    }
}

/// `/`: a zero divisor gives `#DIV/0!`
pub fn op_div(a: &Token, b: &Token) -> Token {
    static DIVIDE: Lazy<InfixFn> = Lazy::new(|| Arc::new(numeric(|x, y| x / y)));

    match (numeric_operand(a), numeric_operand(b)) {
        (Numeric::Value(_), Numeric::Value(d)) if d.is_zero() => {
            Token::error(ErrorCode::ZeroDiv, "Division by zero")
        }
        _ => DIVIDE(a, b),
    }
}

/// Ordering rank across kinds: numbers < text < logicals
fn kind_rank(token: &Token) -> u8 {
    match token {
        Token::Text(_) => 1,
        Token::Logical(_) => 2,
        _ => 0,
    }
}

fn compare(a: &Token, b: &Token, accept: fn(Ordering) -> bool) -> Token {
    if let Some(err) = propagate(a, b) {
        return err;
    }
    if !is_value(a) || !is_value(b) {
        return not_values(a, b);
    }

    let ordering = match (a, b) {
        (Token::Text(x), Token::Text(y)) => {
            Some(x.as_str().to_lowercase().cmp(&y.as_str().to_lowercase()))
        }
        (Token::Logical(x), Token::Logical(y)) => Some(x.cmp(y)),
        (x, y) if kind_rank(x) == 0 && kind_rank(y) == 0 => {
            // Omitted operands compare as zero
            let x = x.as_number().unwrap_or(Number::Int(0));
            let y = y.as_number().unwrap_or(Number::Int(0));
            x.partial_cmp(&y)
        }
        (x, y) => Some(kind_rank(x).cmp(&kind_rank(y))),
    };

    match ordering {
        Some(ordering) => Token::Logical(accept(ordering)),
        None => Token::error(ErrorCode::Num, "Cannot order NaN"),
    }
}

/// `<`
pub fn op_lt(a: &Token, b: &Token) -> Token {
    compare(a, b, Ordering::is_lt)
}

/// `>`
pub fn op_gt(a: &Token, b: &Token) -> Token {
    compare(a, b, Ordering::is_gt)
}

/// `<=`
pub fn op_le(a: &Token, b: &Token) -> Token {
    compare(a, b, Ordering::is_le)
}

/// `>=`
pub fn op_ge(a: &Token, b: &Token) -> Token {
    compare(a, b, Ordering::is_ge)
}
