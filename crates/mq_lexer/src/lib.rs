//! Hand-written scanner for the M expression language.
//!
//! Produces a `LexerSnapshot`: an immutable, indexable token stream where
//! every token carries grapheme-aware start/end positions. The snapshot is
//! the only lexer surface the parser consumes.

mod error;
mod scan;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{LexError, LexErrorKind};
pub use snapshot::LexerSnapshot;

/// Tokenize `text` into a snapshot.
pub fn try_lex(text: impl Into<String>) -> Result<LexerSnapshot, LexError> {
    let text = text.into();
    let (tokens, end_position) = scan::scan(&text)?;
    Ok(LexerSnapshot::new(text, tokens, end_position))
}
