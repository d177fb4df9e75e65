//! Type expressions: `type` primary types, nullable primitive types, and
//! primitive types.

use mq_ir::{
    AstPayload, ConstantKind, Keyword, NodeId, NodeKind, PrimitiveTypeConstant, TokenKind,
};

use crate::grammar::helpers::{read_current_token_as_constant, read_token_kind_as_constant};
use crate::{ParseResult, Parser, ParserState};

/// `type <primary type>`, or fall through to a primary expression.
pub(crate) fn read_type_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    if !state.is_on_token_kind(&TokenKind::Keyword(Keyword::Type)) {
        return (parser.read_primary_expression)(state, parser);
    }
    state.start_context(NodeKind::TypePrimaryType)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Type), ConstantKind::Type)?;
    (parser.read_nullable_primitive_type)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `as <nullable primitive type>`, the typed slot of parameters and
/// function return types.
pub(crate) fn read_as_nullable_primitive_type(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::AsNullablePrimitiveType)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::As), ConstantKind::As)?;
    (parser.read_nullable_primitive_type)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `nullable? <primitive type>`.
pub(crate) fn read_nullable_primitive_type(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    if state.maybe_current_token_kind() == Some(&TokenKind::Identifier)
        && state.maybe_current_token_text() == Some("nullable")
    {
        state.start_context(NodeKind::NullablePrimitiveType)?;
        read_current_token_as_constant(state, ConstantKind::Nullable)?;
        (parser.read_primitive_type)(state, parser)?;
        return Ok(state.end_context(AstPayload::Composite)?);
    }
    (parser.read_primitive_type)(state, parser)
}

/// One of the closed primitive type names, `null`, or `type`.
pub(crate) fn read_primitive_type(
    state: &mut ParserState<'_>,
    _parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::PrimitiveType)?;
    let Some(token) = state.maybe_current_token().cloned() else {
        return Err(state.expected_any_token_kind_error(vec![
            TokenKind::Identifier,
            TokenKind::NullLiteral,
        ]));
    };
    let constant = match &token.kind {
        TokenKind::Identifier => {
            let text = state.lexer_snapshot().token_text(&token);
            match PrimitiveTypeConstant::from_str(text) {
                Some(constant) => constant,
                None => return Err(state.invalid_primitive_type_error(&token)),
            }
        }
        TokenKind::NullLiteral => PrimitiveTypeConstant::Null,
        TokenKind::Keyword(Keyword::Type) => PrimitiveTypeConstant::Type,
        _ => return Err(state.invalid_primitive_type_error(&token)),
    };
    state.advance_token();
    Ok(state.end_context(AstPayload::PrimitiveType(constant))?)
}
