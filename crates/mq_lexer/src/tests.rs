use mq_ir::{Keyword, TokenKind};

use crate::{try_lex, LexErrorKind};

#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn kinds(text: &str) -> Vec<TokenKind> {
    try_lex(text)
        .unwrap()
        .tokens()
        .iter()
        .map(|token| token.kind.clone())
        .collect()
}

#[test]
fn lexes_a_let_expression() {
    assert_eq!(
        kinds("let x = 1 in x"),
        vec![
            TokenKind::Keyword(Keyword::Let),
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::NumericLiteral,
            TokenKind::Keyword(Keyword::In),
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn lexes_compound_punctuators() {
    assert_eq!(
        kinds("<= >= <> => .. ..."),
        vec![
            TokenKind::LessThanEqualTo,
            TokenKind::GreaterThanEqualTo,
            TokenKind::NotEqual,
            TokenKind::FatArrow,
            TokenKind::DotDot,
            TokenKind::Ellipsis,
        ]
    );
}

#[test]
fn lexes_numbers() {
    assert_eq!(
        kinds("1 3.14 .5 2e-8 0xFF"),
        vec![
            TokenKind::NumericLiteral,
            TokenKind::NumericLiteral,
            TokenKind::NumericLiteral,
            TokenKind::NumericLiteral,
            TokenKind::HexLiteral,
        ]
    );
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn text_literal_keeps_quote_escapes() {
    let snapshot = try_lex(r#""say ""hi""""#).unwrap();
    assert_eq!(snapshot.tokens().len(), 1);
    assert_eq!(snapshot.tokens()[0].kind, TokenKind::TextLiteral);
    assert_eq!(snapshot.token_text(&snapshot.tokens()[0]), r#""say ""hi""""#);
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn quoted_identifier_and_hash_constructor() {
    let snapshot = try_lex(r##"#"weird name" #date"##).unwrap();
    assert_eq!(snapshot.tokens()[0].kind, TokenKind::QuotedIdentifier);
    assert_eq!(snapshot.tokens()[1].kind, TokenKind::Identifier);
    assert_eq!(snapshot.token_text(&snapshot.tokens()[1]), "#date");
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn dotted_identifiers_stay_one_token() {
    let snapshot = try_lex("Text.From(x)").unwrap();
    assert_eq!(snapshot.token_text(&snapshot.tokens()[0]), "Text.From");
    assert_eq!(snapshot.tokens()[1].kind, TokenKind::LeftParenthesis);
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn positions_track_lines() {
    let snapshot = try_lex("1\n  two").unwrap();
    let two = &snapshot.tokens()[1];
    assert_eq!(two.position_start.line_number, 1);
    assert_eq!(two.position_start.line_code_unit, 2);
    assert_eq!(two.position_start.code_unit, 4);
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn column_counts_graphemes_not_bytes() {
    // The flag emoji is one grapheme but many bytes.
    let snapshot = try_lex("\"🇺🇸\" x").unwrap();
    let x = &snapshot.tokens()[1];
    // Tokens on the line: the text literal (3 graphemes: quote, flag,
    // quote) plus the separating space.
    assert_eq!(snapshot.column_number_start_of(x), 4);
    assert!(x.position_start.line_code_unit > 4, "byte column is wider");
}

#[test]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // trailing\n/* block */ 2"),
        vec![TokenKind::NumericLiteral, TokenKind::NumericLiteral]
    );
    let snapshot = try_lex("// only a comment").unwrap();
    assert!(snapshot.tokens().is_empty());
}

#[test]
fn unterminated_text_reports_start() {
    let error = try_lex("\"abc").unwrap_err();
    assert_eq!(error.kind, LexErrorKind::UnterminatedText);
    assert_eq!(error.position.code_unit, 0);
}

#[test]
fn unexpected_character_is_an_error() {
    let error = try_lex("1 ^ 2").unwrap_err();
    assert_eq!(error.kind, LexErrorKind::UnexpectedCharacter('^'));
}
