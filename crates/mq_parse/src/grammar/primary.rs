//! Primary expressions and their recursive suffixes.

use mq_ir::{AstPayload, ConstantKind, Keyword, LiteralKind, NodeId, NodeKind, TokenKind};

use crate::error::CsvContinuationKind;
use crate::grammar::helpers::{
    maybe_read_token_kind_as_constant, read_closing_token_kind_as_constant, read_csv_array,
    read_current_token_as_constant, read_generalized_identifier, read_identifier,
    read_token_kind_as_constant, UnterminatedKind,
};
use crate::{InnerParseError, ParseResult, Parser, ParserState};

/// A primary expression, wrapped in a `RecursivePrimaryExpression` when
/// invoke / item-access / field-selector suffixes follow the head.
pub(crate) fn read_primary_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::RecursivePrimaryExpression)?;
    let head = read_primary_head(state, parser)?;
    if !is_on_suffix_start(state) {
        state.delete_context()?;
        return Ok(head);
    }
    state.start_context(NodeKind::ArrayWrapper)?;
    while is_on_suffix_start(state) {
        match state.maybe_current_token_kind() {
            Some(TokenKind::LeftParenthesis) => read_invoke_expression(state, parser)?,
            Some(TokenKind::LeftBrace) => read_item_access_expression(state, parser)?,
            Some(TokenKind::LeftBracket) => read_field_selector(state)?,
            _ => break,
        };
    }
    state.end_context(AstPayload::Composite)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

fn is_on_suffix_start(state: &ParserState<'_>) -> bool {
    matches!(
        state.maybe_current_token_kind(),
        Some(TokenKind::LeftParenthesis)
            | Some(TokenKind::LeftBrace)
            | Some(TokenKind::LeftBracket)
    )
}

fn read_primary_head(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    match state.maybe_current_token_kind() {
        Some(TokenKind::NumericLiteral)
        | Some(TokenKind::HexLiteral)
        | Some(TokenKind::TextLiteral)
        | Some(TokenKind::NullLiteral)
        | Some(TokenKind::Keyword(Keyword::True))
        | Some(TokenKind::Keyword(Keyword::False)) => {
            (parser.read_literal_expression)(state, parser)
        }
        Some(TokenKind::Identifier)
        | Some(TokenKind::QuotedIdentifier)
        | Some(TokenKind::AtSign) => (parser.read_identifier_expression)(state, parser),
        Some(TokenKind::LeftParenthesis) => (parser.read_parenthesized_expression)(state, parser),
        Some(TokenKind::LeftBrace) => (parser.read_list_expression)(state, parser),
        Some(TokenKind::LeftBracket) => (parser.read_record_expression)(state, parser),
        Some(TokenKind::Ellipsis) => (parser.read_not_implemented_expression)(state, parser),
        _ => Err(state.expected_any_token_kind_error(vec![
            TokenKind::Identifier,
            TokenKind::NumericLiteral,
            TokenKind::TextLiteral,
            TokenKind::NullLiteral,
            TokenKind::LeftParenthesis,
            TokenKind::LeftBrace,
            TokenKind::LeftBracket,
            TokenKind::Ellipsis,
        ])),
    }
}

pub(crate) fn read_literal_expression(
    state: &mut ParserState<'_>,
    _parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::LiteralExpression)?;
    let literal_kind = match state.maybe_current_token_kind() {
        Some(TokenKind::NumericLiteral) | Some(TokenKind::HexLiteral) => LiteralKind::Numeric,
        Some(TokenKind::TextLiteral) => LiteralKind::Text,
        Some(TokenKind::NullLiteral) => LiteralKind::Null,
        Some(TokenKind::Keyword(Keyword::True)) | Some(TokenKind::Keyword(Keyword::False)) => {
            LiteralKind::Logical
        }
        _ => {
            return Err(state.expected_any_token_kind_error(vec![
                TokenKind::NumericLiteral,
                TokenKind::TextLiteral,
                TokenKind::NullLiteral,
            ]))
        }
    };
    let literal = state
        .maybe_current_token_text()
        .unwrap_or_default()
        .to_string();
    state.advance_token();
    Ok(state.end_context(AstPayload::Literal {
        literal,
        literal_kind,
    })?)
}

/// `@name` or `name`.
pub(crate) fn read_identifier_expression(
    state: &mut ParserState<'_>,
    _parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::IdentifierExpression)?;
    maybe_read_token_kind_as_constant(state, &TokenKind::AtSign, ConstantKind::AtSign)?;
    read_identifier(state)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_parenthesized_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ParenthesizedExpression)?;
    let open = expect_open_token(state, &TokenKind::LeftParenthesis)?;
    read_token_kind_as_constant(state, &TokenKind::LeftParenthesis, ConstantKind::LeftParenthesis)?;
    (parser.read_expression)(state, parser)?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightParenthesis,
        ConstantKind::RightParenthesis,
        &open,
        UnterminatedKind::Parentheses,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_list_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ListExpression)?;
    let open = expect_open_token(state, &TokenKind::LeftBrace)?;
    read_token_kind_as_constant(state, &TokenKind::LeftBrace, ConstantKind::LeftBrace)?;
    read_csv_array(
        state,
        parser,
        &mut |state: &mut ParserState<'_>, parser: &Parser| (parser.read_expression)(state, parser),
        |kind| matches!(kind, None | Some(TokenKind::RightBrace)),
        CsvContinuationKind::DanglingComma,
    )?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightBrace,
        ConstantKind::RightBrace,
        &open,
        UnterminatedKind::Bracket,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_record_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::RecordExpression)?;
    let open = expect_open_token(state, &TokenKind::LeftBracket)?;
    read_token_kind_as_constant(state, &TokenKind::LeftBracket, ConstantKind::LeftBracket)?;
    read_csv_array(
        state,
        parser,
        &mut read_generalized_identifier_paired_expression,
        |kind| matches!(kind, None | Some(TokenKind::RightBracket)),
        CsvContinuationKind::DanglingComma,
    )?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightBracket,
        ConstantKind::RightBracket,
        &open,
        UnterminatedKind::Bracket,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_not_implemented_expression(
    state: &mut ParserState<'_>,
    _parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::NotImplementedExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Ellipsis, ConstantKind::Ellipsis)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `key = expression` with a generalized-identifier key.
fn read_generalized_identifier_paired_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::GeneralizedIdentifierPairedExpression)?;
    read_generalized_identifier(state)?;
    read_token_kind_as_constant(state, &TokenKind::Equal, ConstantKind::Equal)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

// --- Recursive-primary suffixes ---

fn read_invoke_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::InvokeExpression)?;
    let open = expect_open_token(state, &TokenKind::LeftParenthesis)?;
    read_token_kind_as_constant(state, &TokenKind::LeftParenthesis, ConstantKind::LeftParenthesis)?;
    read_csv_array(
        state,
        parser,
        &mut |state: &mut ParserState<'_>, parser: &Parser| (parser.read_expression)(state, parser),
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

fn read_item_access_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ItemAccessExpression)?;
    let open = expect_open_token(state, &TokenKind::LeftBrace)?;
    read_token_kind_as_constant(state, &TokenKind::LeftBrace, ConstantKind::LeftBrace)?;
    (parser.read_expression)(state, parser)?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightBrace,
        ConstantKind::RightBrace,
        &open,
        UnterminatedKind::Bracket,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

fn read_field_selector(state: &mut ParserState<'_>) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::FieldSelector)?;
    let open = expect_open_token(state, &TokenKind::LeftBracket)?;
    read_token_kind_as_constant(state, &TokenKind::LeftBracket, ConstantKind::LeftBracket)?;
    read_generalized_identifier(state)?;
    read_closing_token_kind_as_constant(
        state,
        &TokenKind::RightBracket,
        ConstantKind::RightBracket,
        &open,
        UnterminatedKind::Bracket,
    )?;
    Ok(state.end_context(AstPayload::Composite)?)
}

/// Clone the opening token before consuming it, for unterminated-bracket
/// diagnostics.
fn expect_open_token(
    state: &ParserState<'_>,
    kind: &TokenKind,
) -> Result<mq_ir::Token, InnerParseError> {
    match state.maybe_current_token() {
        Some(token) if &token.kind == kind => Ok(token.clone()),
        _ => Err(state.expected_token_kind_error(kind.clone())),
    }
}
