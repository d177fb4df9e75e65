//! The production set.
//!
//! Each production follows the same discipline: start a context, read the
//! expected tokens (recursing into sub-productions), promote the context.
//! Failures leave the open contexts in place; that recoverable mid-parse
//! state is what the caret inspections consume.

pub(crate) mod expression;
pub(crate) mod function;
pub(crate) mod helpers;
pub(crate) mod primary;
pub(crate) mod section;
pub(crate) mod types;

use mq_ir::{Keyword, NodeId, TokenKind};

use crate::{ParseResult, Parser, ParserState};

/// A document is an expression or a section.
pub(crate) fn read_document(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    tracing::trace!(
        tokens = state.lexer_snapshot().token_count(),
        "reading document"
    );
    if state.is_on_token_kind(&TokenKind::Keyword(Keyword::Section)) {
        (parser.read_section_document)(state, parser)
    } else {
        (parser.read_expression)(state, parser)
    }
}
