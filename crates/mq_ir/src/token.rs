//! Tokens produced by the lexer.

use std::fmt;

use crate::{GraphemePosition, Keyword, Span};

/// A token with its byte span and grapheme-aware boundary positions.
///
/// The token does not carry its text; slice the snapshot with `span`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub position_start: GraphemePosition,
    pub position_end: GraphemePosition,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        span: Span,
        position_start: GraphemePosition,
        position_end: GraphemePosition,
    ) -> Self {
        Token {
            kind,
            span,
            position_start,
            position_end,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.kind.display_name(), self.span)
    }
}

/// The closed token enumeration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Identifier,
    /// `#"quoted identifier"`
    QuotedIdentifier,
    NumericLiteral,
    HexLiteral,
    TextLiteral,
    NullLiteral,
    Keyword(Keyword),

    Ampersand,
    Asterisk,
    AtSign,
    Comma,
    Division,
    DotDot,
    Ellipsis,
    Equal,
    FatArrow,
    GreaterThan,
    GreaterThanEqualTo,
    LeftBrace,
    LeftBracket,
    LeftParenthesis,
    LessThan,
    LessThanEqualTo,
    Minus,
    NotEqual,
    Plus,
    RightBrace,
    RightBracket,
    RightParenthesis,
    Semicolon,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "an identifier",
            TokenKind::QuotedIdentifier => "a quoted identifier",
            TokenKind::NumericLiteral => "a number",
            TokenKind::HexLiteral => "a hex literal",
            TokenKind::TextLiteral => "a text literal",
            TokenKind::NullLiteral => "`null`",
            TokenKind::Keyword(keyword) => keyword.as_str(),
            TokenKind::Ampersand => "`&`",
            TokenKind::Asterisk => "`*`",
            TokenKind::AtSign => "`@`",
            TokenKind::Comma => "`,`",
            TokenKind::Division => "`/`",
            TokenKind::DotDot => "`..`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::Equal => "`=`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::GreaterThan => "`>`",
            TokenKind::GreaterThanEqualTo => "`>=`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::LeftParenthesis => "`(`",
            TokenKind::LessThan => "`<`",
            TokenKind::LessThanEqualTo => "`<=`",
            TokenKind::Minus => "`-`",
            TokenKind::NotEqual => "`<>`",
            TokenKind::Plus => "`+`",
            TokenKind::RightBrace => "`}`",
            TokenKind::RightBracket => "`]`",
            TokenKind::RightParenthesis => "`)`",
            TokenKind::Semicolon => "`;`",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
