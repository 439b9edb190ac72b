//! Integration tests for the CSS3 tokenizer.

use csscull_common::{DiagnosticKind, Position};
use csscull_css::tokenizer::{Token, TokenKind, Tokenizer, TokenizerConfig};

/// Helper to tokenize a string and return the token kinds and texts.
fn tokenize(input: &str) -> Vec<(TokenKind, &str)> {
    let (tokens, diagnostics) = Tokenizer::new().tokenize_all(input);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    tokens.iter().map(|token| (token.kind, token.text)).collect()
}

#[test]
fn test_pixel() {
    assert_eq!(tokenize("10px"), vec![(TokenKind::Pixel, "10px")]);
}

#[test]
fn test_unknown_unit_is_generic_dimension() {
    assert_eq!(tokenize("10kg"), vec![(TokenKind::Dimension, "10kg")]);
}

#[test]
fn test_every_unit_has_its_kind() {
    let cases = [
        ("1em", TokenKind::Em),
        ("1ex", TokenKind::Ex),
        ("1px", TokenKind::Pixel),
        ("1cm", TokenKind::Centimeter),
        ("1mm", TokenKind::Millimeter),
        ("1in", TokenKind::Inch),
        ("1pt", TokenKind::Point),
        ("1pc", TokenKind::Pica),
        ("1deg", TokenKind::Degree),
        ("1rad", TokenKind::Radian),
        ("1grad", TokenKind::Gradian),
        ("1ms", TokenKind::Millisecond),
        ("1s", TokenKind::Second),
        ("1Hz", TokenKind::Hertz),
        ("1kHz", TokenKind::Kilohertz),
    ];
    for (input, kind) in cases {
        assert_eq!(tokenize(input), vec![(kind, input)], "{input}");
    }
}

#[test]
fn test_whitespace_and_comments_are_dropped() {
    assert_eq!(
        tokenize("  a /* b { } */\n\t c  "),
        vec![(TokenKind::Ident, "a"), (TokenKind::Ident, "c")]
    );
}

#[test]
fn test_keyword_classification() {
    assert_eq!(
        tokenize("background-color red div"),
        vec![
            (TokenKind::PropertyName, "background-color"),
            (TokenKind::ColorKeyword, "red"),
            (TokenKind::Ident, "div"),
        ]
    );
}

#[test]
fn test_functions_not_and_uri() {
    assert_eq!(
        tokenize(":not( rgba( url(a.png) url( 'b c.png' )"),
        vec![
            (TokenKind::Colon, ":"),
            (TokenKind::Not, "not("),
            (TokenKind::Function, "rgba("),
            (TokenKind::Uri, "url(a.png)"),
            (TokenKind::Uri, "url( 'b c.png' )"),
        ]
    );
}

#[test]
fn test_attribute_operators() {
    assert_eq!(
        tokenize("~= |= ^= $= *= = | *"),
        vec![
            (TokenKind::Includes, "~="),
            (TokenKind::DashMatch, "|="),
            (TokenKind::PrefixMatch, "^="),
            (TokenKind::SuffixMatch, "$="),
            (TokenKind::SubstringMatch, "*="),
            (TokenKind::Equals, "="),
            (TokenKind::Pipe, "|"),
            (TokenKind::Star, "*"),
        ]
    );
}

#[test]
fn test_at_keywords() {
    assert_eq!(
        tokenize("@import @IMPORT @namespace @media @imports"),
        vec![
            (TokenKind::ImportSym, "@import"),
            (TokenKind::ImportSym, "@IMPORT"),
            (TokenKind::NamespaceSym, "@namespace"),
            (TokenKind::AtKeyword, "@media"),
            (TokenKind::AtKeyword, "@imports"),
        ]
    );
}

#[test]
fn test_numbers_strings_hashes() {
    assert_eq!(
        tokenize("12 1.5 50% \"a\\\"b\" 'c' #zz #0a0"),
        vec![
            (TokenKind::Number, "12"),
            (TokenKind::Number, "1.5"),
            (TokenKind::Percentage, "50%"),
            (TokenKind::String, "\"a\\\"b\""),
            (TokenKind::String, "'c'"),
            (TokenKind::Hash, "#zz"),
            (TokenKind::Hash, "#0a0"),
        ]
    );
}

#[test]
fn test_cdo_cdc() {
    assert_eq!(
        tokenize("<!-- a -->"),
        vec![
            (TokenKind::Cdo, "<!--"),
            (TokenKind::Ident, "a"),
            (TokenKind::Cdc, "-->"),
        ]
    );
}

#[test]
fn test_tokenizing_is_restartable() {
    let tokenizer = Tokenizer::new();
    let input = "div > p.note { margin: 0 auto; }";
    let first: Vec<Token<'_>> = tokenizer.tokenize(input).filter_map(Result::ok).collect();
    let second: Vec<Token<'_>> = tokenizer.tokenize(input).filter_map(Result::ok).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 12);
}

#[test]
fn test_illegal_character_is_skipped() {
    let (tokens, diagnostics) = Tokenizer::new().tokenize_all("a ` b");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].text, "b");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::IllegalCharacter('`'));
    assert_eq!(diagnostics[0].position, Position::new(2, 1, 3));
}

#[test]
fn test_positions_and_lines() {
    let (tokens, _) = Tokenizer::new().tokenize_all("a\n/* x\ny */ b\r\n  c");
    let positions: Vec<Position> = tokens.iter().map(|token| token.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(0, 1, 1),
            Position::new(12, 3, 6),
            Position::new(17, 4, 3),
        ]
    );
    assert_eq!(tokens[1].end(), 13);
}

#[test]
fn test_debug_mode_yields_the_same_tokens() {
    let input = "a:hover { color: #fff }";
    let plain = Tokenizer::new().tokenize_all(input);
    let debug = Tokenizer::with_config(TokenizerConfig::default().with_debug(true)).tokenize_all(input);
    assert_eq!(plain, debug);
}
