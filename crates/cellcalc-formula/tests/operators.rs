//! Built-in operators driven through whole formulas.

use cellcalc_core::{ErrorCode, Scalar, Token};
use cellcalc_formula::interpreter;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn run(tokens: Vec<Token>) -> Scalar {
    interpreter(Some(tokens))
        .unwrap()
        .unwrap()
        .evaluate(&HashMap::<String, Token>::new())
        .unwrap()
}

fn binary(a: Token, symbol: &str, b: Token) -> Scalar {
    run(vec![a, Token::infix(symbol), b])
}

fn ref_error() -> Token {
    Token::error(ErrorCode::Ref, "Undefined message")
}

fn num_error() -> Token {
    Token::error(ErrorCode::Num, "Undefined message")
}

#[test]
fn test_concat() {
    assert_eq!(binary("hi ".into(), "&", "world".into()), "hi world");
    assert_eq!(binary(1.into(), "&", 2.into()), "12");
    assert_eq!(binary(ref_error(), "&", "world".into()), "#REF!");
    assert_eq!(binary("hi ".into(), "&", ref_error()), "#REF!");
}

#[test]
fn test_add() {
    assert_eq!(binary(1.into(), "+", 2.into()), 3);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(binary(1.into(), "/", 0.into()), "#DIV/0!");
    assert_eq!(binary(1.into(), "/", 0.0.into()), "#DIV/0!");
}

#[test]
fn test_division_by_zero_flows_on() {
    // 1/0+5
    let tokens = vec![
        Token::from(1),
        Token::infix("/"),
        Token::from(0),
        Token::infix("+"),
        Token::from(5),
    ];
    assert_eq!(run(tokens), "#DIV/0!");
}

#[test]
fn test_equality() {
    assert_eq!(binary(1.into(), "=", 0.into()), false);
    assert_eq!(binary(1.into(), "==", 1.into()), true);
    assert_eq!(binary(num_error(), "=", 0.into()), "#NUM!");
    assert_eq!(binary(0.into(), "=", num_error()), "#NUM!");
}

#[test]
fn test_inequality() {
    assert_eq!(binary("a".into(), "<>", "A".into()), true);
    assert_eq!(binary(2.into(), "!=", 2.0.into()), false);
}

#[test]
fn test_comparisons() {
    assert_eq!(binary(1.into(), "<", 2.into()), true);
    assert_eq!(binary(2.into(), ">", 2.into()), false);
    assert_eq!(binary("b".into(), ">=", "B".into()), true);
    assert_eq!(binary(true.into(), "<=", 1.into()), false);
}

#[test]
fn test_comparison_precedence() {
    // 1+1=2
    let tokens = vec![
        Token::from(1),
        Token::infix("+"),
        Token::from(1),
        Token::infix("="),
        Token::from(2),
    ];
    assert_eq!(run(tokens), true);

    // "a"&"b"="ab"
    let tokens = vec![
        Token::text("a"),
        Token::infix("&"),
        Token::text("b"),
        Token::infix("="),
        Token::text("ab"),
    ];
    assert_eq!(run(tokens), true);
}

#[test]
fn test_arithmetic_type_errors() {
    assert_eq!(binary("x".into(), "*", 2.into()), "#VALUE!");
    assert_eq!(binary(true.into(), "+", true.into()), 2);
}

#[test]
fn test_prefix_plus() {
    assert_eq!(run(vec![Token::prefix("+"), Token::from(3)]), 3);
}
