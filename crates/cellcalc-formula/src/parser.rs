//! Formula parser
//!
//! Converts an infix token sequence into an [`RpnProgram`] with a
//! shunting-yard pass. Function calls keep an argument counter on their
//! stack entry; omitted arguments become `Empty` operands so evaluation can
//! substitute defaults positionally.
//!
//! Operator precedence, lowest first:
//!
//! | Rank | Operators                           | Associativity |
//! |------|-------------------------------------|---------------|
//! | 0    | `= == <> != < > <= >=` (and unknown) | left          |
//! | 1    | `&`                                 | left          |
//! | 2    | `+ -`                               | left          |
//! | 3    | `* /`                               | left          |
//! | 4    | prefix operators                    |               |
//! | 5    | `^`                                 | right         |

use crate::error::{SyntaxError, SyntaxResult};
use crate::functions::{ArgSlot, FunctionRegistry};
use crate::program::{RpnItem, RpnProgram};
use cellcalc_core::{SharedString, Token};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Rank at which prefix operators reduce
const PREFIX_RANK: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Precedence rank and associativity of an infix symbol
fn precedence(symbol: &str) -> (u8, Assoc) {
    match symbol {
        "&" => (1, Assoc::Left),
        "+" | "-" => (2, Assoc::Left),
        "*" | "/" => (3, Assoc::Left),
        "^" => (5, Assoc::Right),
        _ => (0, Assoc::Left),
    }
}

/// What the previous significant token was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    /// An operand or a closed group
    Value,
    Infix,
    Prefix,
    ParenOpen,
    FuncOpen,
    Separator,
}

impl Prev {
    /// An infix operator here would have no left operand
    fn rejects_infix(self) -> bool {
        !matches!(self, Prev::Value)
    }
}

/// An open function call
#[derive(Debug)]
struct CallScope {
    name: SharedString,
    arity: Option<usize>,
    first_required: bool,
    argc: usize,
}

#[derive(Debug)]
enum StackEntry {
    Infix { symbol: SharedString, rank: u8 },
    Prefix(SharedString),
    Paren,
    Call(CallScope),
}

impl StackEntry {
    fn is_scope(&self) -> bool {
        matches!(self, StackEntry::Paren | StackEntry::Call(_))
    }

    fn rank(&self) -> Option<u8> {
        match self {
            StackEntry::Infix { rank, .. } => Some(*rank),
            StackEntry::Prefix(_) => Some(PREFIX_RANK),
            _ => None,
        }
    }
}

/// Parse an infix token sequence into an RPN program
///
/// Function names are checked against `functions`; operator symbols are
/// only resolved at evaluation time.
///
/// # Example
/// ```rust
/// use cellcalc_core::Token;
/// use cellcalc_formula::{parse, FunctionRegistry};
///
/// let tokens = vec![Token::from(1), Token::infix("+"), Token::range("F7")];
/// let program = parse(tokens, FunctionRegistry::builtin()).unwrap();
/// assert_eq!(program.len(), 3);
/// assert_eq!(program.required_inputs().collect::<Vec<_>>(), vec!["F7"]);
/// ```
pub fn parse<I>(tokens: I, functions: &FunctionRegistry) -> SyntaxResult<RpnProgram>
where
    I: IntoIterator<Item = Token>,
{
    let mut parser = Parser::new(functions);
    for (position, token) in tokens.into_iter().enumerate() {
        parser.push(position, token)?;
    }
    let program = parser.finish()?;

    debug!(
        items = program.len(),
        inputs = ?program.required_inputs().collect::<Vec<_>>(),
        "built RPN program"
    );
    Ok(program)
}

struct Parser<'a> {
    functions: &'a FunctionRegistry,
    output: Vec<RpnItem>,
    stack: Vec<StackEntry>,
    inputs: BTreeSet<String>,
    prev: Prev,
}

impl<'a> Parser<'a> {
    fn new(functions: &'a FunctionRegistry) -> Self {
        Self {
            functions,
            output: Vec::new(),
            stack: Vec::new(),
            inputs: BTreeSet::new(),
            prev: Prev::Start,
        }
    }

    fn push(&mut self, position: usize, token: Token) -> SyntaxResult<()> {
        match token {
            Token::Whitespace(_) => return Ok(()),
            Token::Range(name) => {
                self.inputs.insert(name.as_str().to_string());
                self.output.push(RpnItem::Range(name));
                self.prev = Prev::Value;
            }
            Token::Logical(_)
            | Token::Text(_)
            | Token::Number(_)
            | Token::Error(_)
            | Token::Empty => {
                self.output.push(RpnItem::Operand(token));
                self.prev = Prev::Value;
            }
            Token::Infix(ref symbol) => {
                if self.prev.rejects_infix() {
                    return Err(SyntaxError::UnexpectedOperator {
                        token: token.to_string(),
                        position,
                    });
                }
                let symbol = symbol.clone();
                self.infix(symbol);
            }
            Token::Prefix(symbol) => {
                self.stack.push(StackEntry::Prefix(symbol));
                self.prev = Prev::Prefix;
            }
            Token::ParenOpen => {
                if self.prev == Prev::Value {
                    return Err(SyntaxError::MissingOperator { position });
                }
                self.stack.push(StackEntry::Paren);
                self.prev = Prev::ParenOpen;
            }
            Token::FuncOpen(name) => self.open_call(position, name)?,
            Token::ParenClose | Token::FuncClose => self.close(position, &token)?,
            Token::Separator(_) => self.separator(position, &token)?,
            Token::Unrecognized { .. } => {
                return Err(SyntaxError::UnrecognizedToken {
                    token: token.to_string(),
                    position,
                })
            }
        }
        Ok(())
    }

    fn infix(&mut self, symbol: SharedString) {
        let (rank, assoc) = precedence(symbol.as_str());
        while let Some(top) = self.stack.last().and_then(StackEntry::rank) {
            let dominates = match assoc {
                Assoc::Left => top >= rank,
                Assoc::Right => top > rank,
            };
            if !dominates {
                break;
            }
            self.pop_operator();
        }
        self.stack.push(StackEntry::Infix { symbol, rank });
        self.prev = Prev::Infix;
    }

    /// Move the top operator to the output; no-op on a scope entry
    fn pop_operator(&mut self) {
        match self.stack.pop() {
            Some(StackEntry::Infix { symbol, .. }) => self.output.push(RpnItem::Infix(symbol)),
            Some(StackEntry::Prefix(symbol)) => self.output.push(RpnItem::Prefix(symbol)),
            Some(scope) => self.stack.push(scope),
            None => {}
        }
    }

    /// Flush operators down to the innermost open scope
    fn flush_to_scope(&mut self) {
        while self.stack.last().is_some_and(|top| !top.is_scope()) {
            self.pop_operator();
        }
    }

    fn open_call(&mut self, position: usize, name: SharedString) -> SyntaxResult<()> {
        let def = self
            .functions
            .get(name.as_str())
            .ok_or_else(|| SyntaxError::UnknownFunction {
                name: name.as_str().to_string(),
                position,
            })?;

        let first_required = matches!(
            def.slots.as_deref(),
            Some([ArgSlot::Required, ..])
        );
        self.stack.push(StackEntry::Call(CallScope {
            arity: def.arity(),
            first_required,
            name,
            argc: 1,
        }));
        self.prev = Prev::FuncOpen;
        Ok(())
    }

    fn separator(&mut self, position: usize, token: &Token) -> SyntaxResult<()> {
        self.flush_to_scope();
        if !matches!(self.stack.last(), Some(StackEntry::Call(_))) {
            return Err(SyntaxError::UnexpectedSeparator {
                token: token.to_string(),
                position,
            });
        }

        if matches!(self.prev, Prev::FuncOpen | Prev::Separator) {
            self.output.push(RpnItem::Operand(Token::Empty));
        }
        if let Some(StackEntry::Call(scope)) = self.stack.last_mut() {
            scope.argc += 1;
        }
        self.prev = Prev::Separator;
        Ok(())
    }

    fn close(&mut self, position: usize, token: &Token) -> SyntaxResult<()> {
        self.flush_to_scope();
        let scope = match self.stack.pop() {
            Some(StackEntry::Paren) => {
                if matches!(token, Token::FuncClose) {
                    warn!(position, "function close token ends a parenthesis group");
                }
                self.prev = Prev::Value;
                return Ok(());
            }
            Some(StackEntry::Call(scope)) => scope,
            _ => return Err(SyntaxError::UnexpectedClose { position }),
        };

        if matches!(token, Token::ParenClose) {
            warn!(position, function = %scope.name, "parenthesis close token ends a function call");
        }

        let mut argc = scope.argc;
        match self.prev {
            Prev::FuncOpen => match scope.arity {
                Some(0) | None => argc = 0,
                Some(_) if scope.first_required => {
                    return Err(SyntaxError::MissingArgument {
                        function: scope.name.as_str().to_string(),
                        index: 0,
                    })
                }
                Some(_) => self.output.push(RpnItem::Operand(Token::Empty)),
            },
            Prev::Separator => self.output.push(RpnItem::Operand(Token::Empty)),
            _ => {}
        }

        if let Some(expected) = scope.arity {
            if argc != expected {
                return Err(SyntaxError::ArgumentCount {
                    function: scope.name.as_str().to_string(),
                    expected,
                    actual: argc,
                });
            }
        }

        self.output.push(RpnItem::Call {
            name: scope.name,
            argc,
        });
        self.prev = Prev::Value;
        Ok(())
    }

    fn finish(mut self) -> SyntaxResult<RpnProgram> {
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Infix { symbol, .. } => self.output.push(RpnItem::Infix(symbol)),
                StackEntry::Prefix(symbol) => self.output.push(RpnItem::Prefix(symbol)),
                StackEntry::Paren | StackEntry::Call(_) => return Err(SyntaxError::UnmatchedOpen),
            }
        }
        Ok(RpnProgram::new(self.output, self.inputs))
    }
}
