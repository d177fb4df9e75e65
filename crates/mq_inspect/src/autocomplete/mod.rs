//! Autocomplete: keyword and primitive-type suggestions at a caret.
//!
//! Two independent pipelines combined by the caller-facing entry point.
//! Both remain functional over a failed parse: the id map still reflects
//! everything read before the error, and the error's token becomes the
//! trailing token.

mod keyword;
mod primitive_type;

use mq_diagnostic::CommonError;
use mq_ir::{Keyword, NodeIdMapCollection, Position, PrimitiveTypeConstant, Token, TokenKind};
use mq_lexer::LexerSnapshot;

use crate::ActiveNode;

/// The token sitting at or after the caret that the parser could not
/// consume, usually what the user is mid-way through typing.
#[derive(Clone, Debug)]
pub struct TrailingToken {
    pub token: Token,
    pub text: String,
    pub token_index: Option<usize>,
    /// Whether the caret sits inside the token or on its end boundary.
    pub is_in_or_on_position: bool,
}

impl TrailingToken {
    pub fn new(snapshot: &LexerSnapshot, token: Token, position: Position) -> Self {
        let text = snapshot.token_text(&token).to_string();
        let token_index = snapshot.token_index_of(&token);
        let is_in_or_on_position = position.is_after(&token.position_start)
            && position.is_on_or_before(&token.position_end);
        TrailingToken {
            token,
            text,
            token_index,
            is_in_or_on_position,
        }
    }

    /// The token's text when it is word-shaped (something a keyword could
    /// complete); punctuation never participates in prefix filtering.
    pub(crate) fn maybe_word(&self) -> Option<&str> {
        match self.token.kind {
            TokenKind::Identifier | TokenKind::NullLiteral | TokenKind::Keyword(_) => {
                Some(&self.text)
            }
            _ => None,
        }
    }
}

/// The union of both pipelines.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Autocomplete {
    pub keywords: Vec<Keyword>,
    pub primitive_types: Vec<PrimitiveTypeConstant>,
}

/// Compute all suggestions valid at the caret.
///
/// With no active node (an empty document) every document-starting
/// keyword applies.
pub fn autocomplete(
    collection: &NodeIdMapCollection,
    snapshot: &LexerSnapshot,
    maybe_active_node: Option<&ActiveNode<'_>>,
    maybe_trailing_token: Option<&TrailingToken>,
) -> Result<Autocomplete, CommonError> {
    let Some(active) = maybe_active_node else {
        let maybe_word = maybe_trailing_token
            .filter(|trailing| trailing.is_in_or_on_position)
            .and_then(TrailingToken::maybe_word);
        return Ok(Autocomplete {
            keywords: keyword::finalize(Keyword::START_OF_DOCUMENT.to_vec(), maybe_word),
            primitive_types: Vec::new(),
        });
    };
    let inspected = Autocomplete {
        keywords: keyword::autocomplete_keyword(collection, snapshot, active, maybe_trailing_token)?,
        primitive_types: primitive_type::autocomplete_primitive_type(
            collection,
            active,
            maybe_trailing_token,
        )?,
    };
    tracing::debug!(
        keywords = inspected.keywords.len(),
        primitive_types = inspected.primitive_types.len(),
        "autocomplete"
    );
    Ok(inspected)
}
