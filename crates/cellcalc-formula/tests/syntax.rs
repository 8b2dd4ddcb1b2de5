//! Malformed token sequences are rejected while building the interpreter.

use cellcalc_core::Token;
use cellcalc_formula::{interpreter, SyntaxError};
use pretty_assertions::assert_eq;

fn syntax_error(tokens: Vec<Token>) -> SyntaxError {
    match interpreter(Some(tokens)) {
        Err(err) => err,
        Ok(_) => panic!("expected a syntax error"),
    }
}

fn message(tokens: Vec<Token>) -> String {
    syntax_error(tokens).to_string()
}

#[test]
fn test_incomplete_call() {
    assert_eq!(
        message(vec![Token::func("SEARCH(")]),
        "Unmatched `(` (missing closing parenthesis)."
    );
}

#[test]
fn test_non_existing_function() {
    assert_eq!(
        syntax_error(vec![Token::func("ROBIN("), Token::FuncClose]),
        SyntaxError::UnknownFunction {
            name: "ROBIN(".into(),
            position: 0
        }
    );
}

#[test]
fn test_not_without_arguments() {
    assert_eq!(
        message(vec![Token::func("NOT("), Token::FuncClose]),
        "Missing required argument at 0 for function `NOT(`"
    );
}

#[test]
fn test_double_close() {
    assert_eq!(
        message(vec![Token::ParenOpen, Token::ParenClose, Token::ParenClose]),
        "Unexpected `)` at position 2 (too many closing parentheses)."
    );
}

#[test]
fn test_operator_after_open() {
    assert_eq!(
        message(vec![Token::ParenOpen, Token::infix("+"), Token::ParenClose]),
        "Unexpected operator `Token<v:+ t:OPERATOR-INFIX s: >` at position 1."
    );
}

#[test]
fn test_leading_operator() {
    assert_eq!(
        message(vec![Token::infix("*"), Token::from(2)]),
        "Unexpected operator `Token<v:* t:OPERATOR-INFIX s: >` at position 0."
    );
}

#[test]
fn test_missing_operator_before_paren() {
    assert_eq!(
        message(vec![Token::from(2), Token::ParenOpen]),
        "Missing operator before '(' at position 1."
    );
}

#[test]
fn test_trailing_separator_counts_as_argument() {
    assert_eq!(
        message(vec![
            Token::func("NOT("),
            Token::from(true),
            Token::separator(),
            Token::FuncClose,
        ]),
        "Function `NOT(` expects 1 arguments but got 2."
    );
}

#[test]
fn test_lone_separator_counts_as_two_arguments() {
    assert_eq!(
        message(vec![Token::func("NOT("), Token::separator(), Token::FuncClose]),
        "Function `NOT(` expects 1 arguments but got 2."
    );
}

#[test]
fn test_whitespace_is_ignored() {
    let evaluator = interpreter(Some(vec![Token::whitespace(""), Token::from(true)]))
        .unwrap()
        .unwrap();
    assert_eq!(evaluator.program().len(), 1);
}

#[test]
fn test_unrecognized_token() {
    assert_eq!(
        message(vec![Token::unrecognized("OPERATOR", "", "XX")]),
        "Unrecognized token `Token<v:XX t:OPERATOR s: >` at position 0."
    );
}

#[test]
fn test_unmatched_paren() {
    assert_eq!(
        message(vec![Token::ParenOpen]),
        "Unmatched `(` (missing closing parenthesis)."
    );
}

#[test]
fn test_too_many_arguments() {
    assert_eq!(
        message(vec![
            Token::func("SEARCH("),
            Token::text("hi"),
            Token::separator(),
            Token::text("hi world"),
            Token::separator(),
            Token::from(1),
            Token::FuncClose,
        ]),
        "Function `SEARCH(` expects 2 arguments but got 3."
    );
}

#[test]
fn test_too_few_arguments() {
    assert_eq!(
        message(vec![Token::func("LEFT("), Token::text("hello"), Token::FuncClose]),
        "Function `LEFT(` expects 2 arguments but got 1."
    );
    assert_eq!(
        message(vec![Token::func("SEARCH("), Token::text("a"), Token::FuncClose]),
        "Function `SEARCH(` expects 2 arguments but got 1."
    );
}

#[test]
fn test_separator_outside_function() {
    assert_eq!(
        message(vec![
            Token::ParenOpen,
            Token::from(1),
            Token::separator(),
            Token::from(2),
            Token::ParenClose,
        ]),
        "Unexpected separator `Token<v:, t:SEP s:ARG >` at position 2."
    );
}

#[test]
fn test_separator_at_top_level() {
    assert!(matches!(
        syntax_error(vec![Token::from(1), Token::separator(), Token::from(2)]),
        SyntaxError::UnexpectedSeparator { position: 1, .. }
    ));
}

#[test]
fn test_separator_inside_group_inside_call() {
    assert!(matches!(
        syntax_error(vec![
            Token::func("LEFT("),
            Token::ParenOpen,
            Token::text("a"),
            Token::separator(),
            Token::from(1),
            Token::ParenClose,
            Token::FuncClose,
        ]),
        SyntaxError::UnexpectedSeparator { position: 3, .. }
    ));
}

#[test]
fn test_positions_count_whitespace() {
    assert_eq!(
        message(vec![
            Token::whitespace(" "),
            Token::from(1),
            Token::whitespace(" "),
            Token::ParenOpen,
        ]),
        "Missing operator before '(' at position 3."
    );
}

