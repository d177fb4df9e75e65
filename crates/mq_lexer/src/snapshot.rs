//! The immutable token stream handed to the parser.

use unicode_segmentation::UnicodeSegmentation;

use mq_ir::{GraphemePosition, Token};

/// An immutable, indexable view of a fully lexed document.
///
/// May be shared freely; parsing never mutates it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LexerSnapshot {
    text: String,
    tokens: Vec<Token>,
    end_position: GraphemePosition,
}

impl LexerSnapshot {
    pub(crate) fn new(text: String, tokens: Vec<Token>, end_position: GraphemePosition) -> Self {
        LexerSnapshot {
            text,
            tokens,
            end_position,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn maybe_token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The source spelling of `token`.
    pub fn token_text(&self, token: &Token) -> &str {
        &self.text[token.span.start as usize..token.span.end as usize]
    }

    /// The index of `token` in the stream, if it belongs to this snapshot.
    pub fn token_index_of(&self, token: &Token) -> Option<usize> {
        self.tokens.iter().position(|candidate| candidate == token)
    }

    pub fn grapheme_position_start_of(&self, token: &Token) -> GraphemePosition {
        token.position_start
    }

    /// Grapheme-accurate column: the number of extended grapheme clusters
    /// on the token's line before the token starts.
    pub fn column_number_start_of(&self, token: &Token) -> u32 {
        let start = token.span.start as usize;
        let line_start = start - token.position_start.line_code_unit as usize;
        self.text[line_start..start].graphemes(true).count() as u32
    }

    /// The position just past the last character of the document.
    pub fn end_position(&self) -> GraphemePosition {
        self.end_position
    }
}
