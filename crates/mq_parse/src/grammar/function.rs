//! Function expressions and parameter lists.

use mq_ir::{AstPayload, ConstantKind, Keyword, NodeId, NodeKind, TokenKind};

use crate::error::CsvContinuationKind;
use crate::grammar::helpers::{
    read_closing_token_kind_as_constant, read_csv_array, read_current_token_as_constant,
    read_identifier, read_token_kind_as_constant, UnterminatedKind,
};
use crate::grammar::types;
use crate::{InnerParseError, ParseResult, Parser, ParserState};

/// `(parameters) as type => body`.
pub(crate) fn read_function_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::FunctionExpression)?;
    (parser.read_parameter_list)(state, parser)?;
    if state.is_on_token_kind(&TokenKind::Keyword(Keyword::As)) {
        types::read_as_nullable_primitive_type(state, parser)?;
    } else {
        state.increment_attribute_counter()?;
    }
    read_token_kind_as_constant(state, &TokenKind::FatArrow, ConstantKind::FatArrow)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_parameter_list(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ParameterList)?;
    let open = match state.maybe_current_token() {
        Some(token) if token.kind == TokenKind::LeftParenthesis => token.clone(),
        _ => return Err(state.expected_token_kind_error(TokenKind::LeftParenthesis)),
    };
    read_token_kind_as_constant(state, &TokenKind::LeftParenthesis, ConstantKind::LeftParenthesis)?;
    let mut optional_seen = false;
    read_csv_array(
        state,
        parser,
        &mut |state: &mut ParserState<'_>, parser: &Parser| {
            read_parameter(state, parser, &mut optional_seen)
        },
        |kind| matches!(kind, None | Some(TokenKind::RightParenthesis)),
        CsvContinuationKind::DanglingComma,
    )?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightParenthesis,
        ConstantKind::RightParenthesis,
        &open,
        UnterminatedKind::Parentheses,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `optional? name (as nullable-primitive-type)?`.
///
/// Once a parameter is optional, every later parameter must be too.
fn read_parameter(
    state: &mut ParserState<'_>,
    parser: &Parser,
    optional_seen: &mut bool,
) -> Result<NodeId, InnerParseError> {
    state.check_cancellation()?;
    state.start_context(NodeKind::Parameter)?;
    let is_optional = is_on_optional_modifier(state);
    if is_optional {
        read_current_token_as_constant(state, ConstantKind::Optional)?;
        *optional_seen = true;
    } else {
        state.increment_attribute_counter()?;
        if *optional_seen {
            return Err(state.required_parameter_error());
        }
    }
    read_identifier(state)?;
    if state.is_on_token_kind(&TokenKind::Keyword(Keyword::As)) {
        types::read_as_nullable_primitive_type(state, parser)?;
    } else {
        state.increment_attribute_counter()?;
    }
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `optional` is contextual: an identifier spelled `optional` followed by
/// another identifier.
fn is_on_optional_modifier(state: &ParserState<'_>) -> bool {
    state.maybe_current_token_kind() == Some(&TokenKind::Identifier)
        && state.maybe_current_token_text() == Some("optional")
        && matches!(
            state.maybe_nth_token_kind(1),
            Some(TokenKind::Identifier) | Some(TokenKind::QuotedIdentifier)
        )
}
