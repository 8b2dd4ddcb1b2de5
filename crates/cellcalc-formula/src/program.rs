//! RPN program representation

use cellcalc_core::{SharedString, Token};
use std::collections::BTreeSet;
use std::fmt;

/// One step of an RPN program
#[derive(Debug, Clone, PartialEq)]
pub enum RpnItem {
    /// Push a literal (an `Empty` operand marks an omitted argument)
    Operand(Token),
    /// Push the input value bound to this name
    Range(SharedString),
    /// Pop two values, apply a binary operator
    Infix(SharedString),
    /// Pop one value, apply a unary operator
    Prefix(SharedString),
    /// Pop `argc` values, call the named function
    Call { name: SharedString, argc: usize },
}

impl fmt::Display for RpnItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpnItem::Operand(Token::Empty) => write!(f, "omitted"),
            RpnItem::Operand(token) => write!(f, "push {}", token),
            RpnItem::Range(name) => write!(f, "load {}", name),
            RpnItem::Infix(symbol) => write!(f, "infix {}", symbol),
            RpnItem::Prefix(symbol) => write!(f, "prefix {}", symbol),
            RpnItem::Call { name, argc } => write!(f, "call {} {}", name, argc),
        }
    }
}

/// Parsed formula: postfix items plus the input names they read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpnProgram {
    items: Vec<RpnItem>,
    required_inputs: BTreeSet<String>,
}

impl RpnProgram {
    pub(crate) fn new(items: Vec<RpnItem>, required_inputs: BTreeSet<String>) -> Self {
        Self {
            items,
            required_inputs,
        }
    }

    /// Items in execution order
    pub fn items(&self) -> &[RpnItem] {
        &self.items
    }

    /// Names of all range operands, sorted
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> {
        self.required_inputs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a RpnProgram {
    type Item = &'a RpnItem;
    type IntoIter = std::slice::Iter<'a, RpnItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for RpnProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        let program = RpnProgram::new(
            vec![
                RpnItem::Range("F7".into()),
                RpnItem::Operand(Token::from(2)),
                RpnItem::Infix("+".into()),
                RpnItem::Operand(Token::Empty),
                RpnItem::Call {
                    name: "LEFT(".into(),
                    argc: 2,
                },
            ],
            ["F7".to_string()].into_iter().collect(),
        );
        assert_eq!(
            program.to_string(),
            "load F7\npush Token<v:2 t:OPERAND s:NUMBER >\ninfix +\nomitted\ncall LEFT( 2\n"
        );
        assert_eq!(program.required_inputs().collect::<Vec<_>>(), vec!["F7"]);
    }
}
