//! Lex errors.

use std::error::Error;
use std::fmt;

use mq_ir::GraphemePosition;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexErrorKind {
    UnterminatedText,
    UnterminatedQuotedIdentifier,
    UnterminatedBlockComment,
    UnexpectedCharacter(char),
}

/// A scan failure, positioned at the offending character or at the start
/// of the unterminated construct.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: GraphemePosition,
}

impl LexError {
    #[cold]
    pub(crate) fn new(kind: LexErrorKind, position: GraphemePosition) -> Self {
        LexError { kind, position }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = format!(
            "line {}, column {}",
            self.position.line_number, self.position.line_code_unit
        );
        match self.kind {
            LexErrorKind::UnterminatedText => {
                write!(f, "unterminated text literal at {location}")
            }
            LexErrorKind::UnterminatedQuotedIdentifier => {
                write!(f, "unterminated quoted identifier at {location}")
            }
            LexErrorKind::UnterminatedBlockComment => {
                write!(f, "unterminated block comment at {location}")
            }
            LexErrorKind::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character `{ch}` at {location}")
            }
        }
    }
}

impl Error for LexError {}
