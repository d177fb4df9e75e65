//! Section documents and their members.

use mq_ir::{AstPayload, ConstantKind, Keyword, NodeId, NodeKind, TokenKind};

use crate::grammar::expression::read_identifier_paired_expression;
use crate::grammar::helpers::{
    maybe_read_token_kind_as_constant, read_identifier, read_token_kind_as_constant,
};
use crate::{ParseResult, Parser, ParserState};

/// `section name; member; member; …`
pub(crate) fn read_section_document(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::Section)?;
    read_token_kind_as_constant(
        state,
        &TokenKind::Keyword(Keyword::Section),
        ConstantKind::Section,
    )?;
    if state.is_on_token_kind(&TokenKind::Identifier) {
        read_identifier(state)?;
    } else {
        state.increment_attribute_counter()?;
    }
    read_token_kind_as_constant(state, &TokenKind::Semicolon, ConstantKind::Semicolon)?;
    state.start_context(NodeKind::ArrayWrapper)?;
    while state.maybe_current_token().is_some() {
        (parser.read_section_member)(state, parser)?;
    }
    state.end_context(AstPayload::Composite)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `shared? name = expression ;`
pub(crate) fn read_section_member(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::SectionMember)?;
    maybe_read_token_kind_as_constant(
        state,
        &TokenKind::Keyword(Keyword::Shared),
        ConstantKind::Shared,
    )?;
    read_identifier_paired_expression(state, parser)?;
    read_token_kind_as_constant(state, &TokenKind::Semicolon, ConstantKind::Semicolon)?;
    Ok(state.end_context(AstPayload::Composite)?)
}
