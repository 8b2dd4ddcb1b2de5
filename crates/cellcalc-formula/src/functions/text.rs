//! Text functions

use super::{arg, settle};
use cellcalc_core::{ErrorCode, Number, Token};

/// Text form of an argument; errors short-circuit as themselves
fn text_arg(token: &Token) -> Result<String, Token> {
    if token.is_error() {
        return Err(token.clone());
    }
    token.as_text().ok_or_else(|| {
        Token::error(
            ErrorCode::Value,
            format!("Expected text but got {}/{}", token.kind(), token.subtype()),
        )
    })
}

/// Integral count argument (num_chars, start_num)
fn count_arg(token: &Token) -> Result<i64, Token> {
    if token.is_error() {
        return Err(token.clone());
    }
    match token {
        Token::Number(n) => n.as_integer().ok_or_else(|| {
            Token::error(ErrorCode::Value, format!("Expected an integer but got {}", n))
        }),
        other => Err(Token::error(
            ErrorCode::Value,
            format!("Expected an integer but got {}", other.subtype()),
        )),
    }
}

/// Count argument that may be left off entirely when called directly
fn optional_count(args: &[Token], index: usize) -> Result<i64, Token> {
    args.get(index).map_or(Ok(1), count_arg)
}

fn num_chars_arg(args: &[Token], index: usize) -> Result<usize, Token> {
    let n = optional_count(args, index)?;
    usize::try_from(n).map_err(|_| {
        Token::error(ErrorCode::Value, format!("Character count must be >= 0, got {}", n))
    })
}

fn take_left(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn take_right(s: &str, n: usize) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(n)).collect()
}

/// Case-insensitive char match over the full lowercase mapping
fn same_folded(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// LEN(text)
pub fn fn_len(args: &[Token]) -> Token {
    settle(text_arg(arg(args, 0)).map(|s| Token::from(s.chars().count() as i64)))
}

/// LEFT(text, [num_chars])
pub fn fn_left(args: &[Token]) -> Token {
    settle(slice(args, take_left))
}

/// RIGHT(text, [num_chars])
pub fn fn_right(args: &[Token]) -> Token {
    settle(slice(args, take_right))
}

fn slice(args: &[Token], take: fn(&str, usize) -> String) -> Result<Token, Token> {
    let text = text_arg(arg(args, 0))?;
    let n = num_chars_arg(args, 1)?;
    Ok(Token::from(take(&text, n)))
}

/// SEARCH(find_text, within_text, [start_num])
///
/// Case-insensitive; positions are 1-based character offsets. The built-in
/// registration declares two slots, so `start_num` is 1 inside formulas.
pub fn fn_search(args: &[Token]) -> Token {
    settle(search(args))
}

fn search(args: &[Token]) -> Result<Token, Token> {
    let needle: Vec<char> = text_arg(arg(args, 0))?.chars().collect();
    let haystack: Vec<char> = text_arg(arg(args, 1))?.chars().collect();
    let start = optional_count(args, 2)?;

    if start < 1 || start as usize > haystack.len() + 1 {
        return Err(Token::error(
            ErrorCode::Value,
            format!("start_num {} is outside 1..={}", start, haystack.len() + 1),
        ));
    }

    let first = start as usize - 1;
    (first..=haystack.len())
        .find(|&i| {
            haystack.len() - i >= needle.len()
                && needle
                    .iter()
                    .zip(&haystack[i..])
                    .all(|(&n, &h)| same_folded(n, h))
        })
        .map(|i| Token::Number(Number::Int(i as i64 + 1)))
        .ok_or_else(|| Token::error(ErrorCode::Value, "Text not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code(token: Token) -> Option<ErrorCode> {
        token.as_error().map(|e| e.code())
    }

    #[test]
    fn test_len() {
        assert_eq!(fn_len(&["hello".into()]), Token::from(5));
        assert_eq!(fn_len(&["".into()]), Token::from(0));
        assert_eq!(fn_len(&[12.5.into()]), Token::from(4));
        assert_eq!(fn_len(&[true.into()]), Token::from(4));
        assert_eq!(fn_len(&["日本語".into()]), Token::from(3));
    }

    #[test]
    fn test_len_rejects_non_text() {
        assert_eq!(code(fn_len(&[Token::Empty])), Some(ErrorCode::Value));
        assert_eq!(code(fn_len(&[Token::range("A1")])), Some(ErrorCode::Value));
    }

    #[test]
    fn test_left_and_right() {
        assert_eq!(fn_left(&["hello".into(), 2.into()]), Token::text("he"));
        assert_eq!(fn_right(&["hello".into(), 3.into()]), Token::text("llo"));
        assert_eq!(fn_right(&["hello".into(), 0.into()]), Token::text(""));
        assert_eq!(fn_left(&["hi".into(), 10.into()]), Token::text("hi"));
        assert_eq!(fn_left(&[12345.into(), 2.into()]), Token::text("12"));
        assert_eq!(fn_left(&[false.into(), 1.into()]), Token::text("F"));
        assert_eq!(fn_right(&[2.0.into(), 1.into()]), Token::text("2"));
    }

    #[test]
    fn test_count_defaults_when_left_off() {
        assert_eq!(fn_left(&["hello".into()]), Token::text("h"));
        assert_eq!(fn_right(&["hello".into()]), Token::text("o"));
        assert_eq!(fn_search(&["l".into(), "hello".into()]), Token::from(3));
    }

    #[test]
    fn test_search_conversions() {
        assert_eq!(fn_search(&["RU".into(), true.into()]), Token::from(2));
        assert_eq!(fn_search(&[false.into(), "XXFALSEYY".into()]), Token::from(3));
        let bad = fn_search(&[Token::range("x"), "abc".into()]);
        assert_eq!(code(bad), Some(ErrorCode::Value));
        let bad = fn_search(&["a".into(), Token::func("X(")]);
        assert_eq!(code(bad), Some(ErrorCode::Value));
    }

    #[test]
    fn test_count_must_be_integral_number() {
        for bad in [Token::from(1.5), Token::text("2"), Token::from(true), Token::from(-1)] {
            assert_eq!(code(fn_left(&["abc".into(), bad.clone()])), Some(ErrorCode::Value));
            assert_eq!(code(fn_right(&["abc".into(), bad])), Some(ErrorCode::Value));
        }
        assert_eq!(fn_left(&["abc".into(), 2.0.into()]), Token::text("ab"));
    }

    #[test]
    fn test_errors_pass_through_first_wins() {
        let first = Token::error(ErrorCode::Na, "first");
        let second = Token::error(ErrorCode::Num, "second");

        let result = fn_left(&[first.clone(), second.clone()]);
        assert!(result.as_error().unwrap().same_instance(first.as_error().unwrap()));

        let result = fn_right(&["abc".into(), second.clone()]);
        assert!(result.as_error().unwrap().same_instance(second.as_error().unwrap()));
    }

    #[test]
    fn test_search() {
        assert_eq!(fn_search(&["a".into(), "abc".into(), 1.into()]), Token::from(1));
        assert_eq!(fn_search(&["C".into(), "abc".into(), 1.into()]), Token::from(3));
        assert_eq!(fn_search(&["b".into(), "abcb".into(), 3.into()]), Token::from(4));
        assert_eq!(fn_search(&[2.into(), 25.into(), 1.into()]), Token::from(1));
        assert_eq!(fn_search(&["".into(), "abc".into(), 2.into()]), Token::from(2));
        assert_eq!(fn_search(&["ÄB".into(), "xäb".into()]), Token::from(2));
    }

    #[test]
    fn test_search_folds_whole_lowercase_mapping() {
        // 'İ' lowercases to "i\u{307}", so it is not a plain 'i'
        assert_eq!(fn_search(&["i".into(), "İi".into()]), Token::from(2));
        assert_eq!(fn_search(&["x".into(), "İx".into()]), Token::from(2));
        assert_eq!(fn_search(&["İ".into(), "aİ".into()]), Token::from(2));
        assert_eq!(code(fn_search(&["i".into(), "İ".into()])), Some(ErrorCode::Value));
    }

    #[test]
    fn test_search_failures() {
        assert_eq!(code(fn_search(&[25.into(), 2.into(), 1.into()])), Some(ErrorCode::Value));
        assert_eq!(code(fn_search(&["a".into(), "abc".into(), 0.into()])), Some(ErrorCode::Value));
        assert_eq!(code(fn_search(&["a".into(), "abc".into(), 5.into()])), Some(ErrorCode::Value));
        assert_eq!(code(fn_search(&["z".into(), "abc".into(), 1.into()])), Some(ErrorCode::Value));
    }
}
