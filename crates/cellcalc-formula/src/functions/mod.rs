//! Function registry and built-in functions
//!
//! Functions are keyed by their function-open name, trailing `(` included
//! (`"LEFT("`), exactly as the tokenizer delivers it. Each definition carries
//! an argument-slot list used for arity checks at parse time and for default
//! substitution at evaluation time; a definition without slots is variadic.

pub mod logical;
pub mod text;

use ahash::AHashMap;
use cellcalc_core::{SharedString, Token};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Function implementation signature
///
/// Arguments arrive resolved and positional. Failures are returned as error
/// tokens, never raised.
pub type FunctionImpl = Arc<dyn Fn(&[Token]) -> Token + Send + Sync>;

/// Built-in function table (lazily initialized, never mutated)
static BUILTIN_FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::with_builtins);

/// One declared argument position
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSlot {
    /// Must be supplied by the caller
    Required,
    /// Substituted with the default when omitted
    Optional(Token),
}

impl ArgSlot {
    /// Optional slot with a default value
    pub fn optional<T: Into<Token>>(default: T) -> Self {
        ArgSlot::Optional(default.into())
    }

    /// The default value, if any
    pub fn default_value(&self) -> Option<&Token> {
        match self {
            ArgSlot::Required => None,
            ArgSlot::Optional(token) => Some(token),
        }
    }
}

/// Function definition
#[derive(Clone)]
pub struct FunctionDef {
    /// Function-open name, e.g. `"SEARCH("`
    pub name: SharedString,
    /// Declared slots (None = variadic)
    pub slots: Option<Vec<ArgSlot>>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Define a function with fixed argument slots
    pub fn new<F>(name: &str, slots: Vec<ArgSlot>, implementation: F) -> Self
    where
        F: Fn(&[Token]) -> Token + Send + Sync + 'static,
    {
        Self {
            name: SharedString::new(name),
            slots: Some(slots),
            implementation: Arc::new(implementation),
        }
    }

    /// Define a function that takes any number of arguments
    pub fn variadic<F>(name: &str, implementation: F) -> Self
    where
        F: Fn(&[Token]) -> Token + Send + Sync + 'static,
    {
        Self {
            name: SharedString::new(name),
            slots: None,
            implementation: Arc::new(implementation),
        }
    }

    /// Number of declared slots, `None` when variadic
    pub fn arity(&self) -> Option<usize> {
        self.slots.as_ref().map(Vec::len)
    }

    /// Invoke the implementation
    pub fn call(&self, args: &[Token]) -> Token {
        (self.implementation)(args)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// Function registry
///
/// Like [`OperatorRegistry`](crate::OperatorRegistry), clones are independent.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: AHashMap<SharedString, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        BUILTIN_FUNCTIONS.clone()
    }

    /// Create a registry with no functions
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
        }
    }

    /// The shared built-in table
    pub fn builtin() -> &'static FunctionRegistry {
        &BUILTIN_FUNCTIONS
    }

    fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.register_logical_functions();
        registry.register_text_functions();

        registry
    }

    /// Look up a function by its function-open name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Register a function, replacing any previous definition of the same name
    pub fn register(&mut self, def: FunctionDef) -> &mut Self {
        self.functions.insert(def.name.clone(), def);
        self
    }

    /// Remove a function, returning its definition
    pub fn unregister(&mut self, name: &str) -> Option<FunctionDef> {
        self.functions.remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn register_logical_functions(&mut self) {
        // NOT
        self.register(FunctionDef::new(
            "NOT(",
            vec![ArgSlot::Required],
            logical::fn_not,
        ));

        // ISERROR
        self.register(FunctionDef::new(
            "ISERROR(",
            vec![ArgSlot::Required],
            logical::fn_iserror,
        ));
    }

    fn register_text_functions(&mut self) {
        // LEN
        self.register(FunctionDef::new("LEN(", vec![ArgSlot::Required], text::fn_len));

        // LEFT
        self.register(FunctionDef::new(
            "LEFT(",
            vec![ArgSlot::Required, ArgSlot::optional(1)],
            text::fn_left,
        ));

        // RIGHT
        self.register(FunctionDef::new(
            "RIGHT(",
            vec![ArgSlot::Required, ArgSlot::optional(1)],
            text::fn_right,
        ));

        // SEARCH
        self.register(FunctionDef::new(
            "SEARCH(",
            vec![ArgSlot::Required, ArgSlot::Required],
            text::fn_search,
        ));
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Argument at `index`, or an omitted marker past the end
pub(crate) fn arg(args: &[Token], index: usize) -> &Token {
    static OMITTED: Token = Token::Empty;
    args.get(index).unwrap_or(&OMITTED)
}

/// Collapse a short-circuited computation into its token
pub(crate) fn settle(result: Result<Token, Token>) -> Token {
    result.unwrap_or_else(|token| token)
}
