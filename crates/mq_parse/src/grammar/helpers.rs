//! Shared reading primitives: constants, identifiers, CSV lists, and the
//! binary-operator shape.

use mq_ir::{AstPayload, ConstantKind, NodeId, NodeKind, Token, TokenKind};

use crate::error::CsvContinuationKind;
use crate::{ParseResult, Parser, ParserState};

/// Read whatever the current token is as a `Constant` leaf. Callers have
/// already matched the token.
pub(crate) fn read_current_token_as_constant(
    state: &mut ParserState<'_>,
    constant: ConstantKind,
) -> ParseResult<NodeId> {
    state.start_context(NodeKind::Constant)?;
    if state.advance_token().is_none() {
        return Err(mq_diagnostic::CommonError::invariant("reading a constant at end of input").into());
    }
    Ok(state.end_context(AstPayload::Constant(constant))?)
}

/// Expect the current token to be `kind` and read it as a `Constant` leaf.
pub(crate) fn read_token_kind_as_constant(
    state: &mut ParserState<'_>,
    kind: &TokenKind,
    constant: ConstantKind,
) -> ParseResult<NodeId> {
    if !state.is_on_token_kind(kind) {
        return Err(state.expected_token_kind_error(kind.clone()));
    }
    read_current_token_as_constant(state, constant)
}

/// Read the current token as a `Constant` leaf when it matches `kind`;
/// otherwise record the skipped child slot and return `None`.
pub(crate) fn maybe_read_token_kind_as_constant(
    state: &mut ParserState<'_>,
    kind: &TokenKind,
    constant: ConstantKind,
) -> ParseResult<Option<NodeId>> {
    if state.is_on_token_kind(kind) {
        Ok(Some(read_current_token_as_constant(state, constant)?))
    } else {
        state.increment_attribute_counter()?;
        Ok(None)
    }
}

/// Which unterminated diagnostic a missing close token maps to.
#[derive(Copy, Clone)]
pub(crate) enum UnterminatedKind {
    Parentheses,
    Bracket,
}

/// Read the closing token of a wrapped construct. Running out of input
/// reports the unterminated bracket rather than a bare expected-token.
pub(crate) fn read_closing_token_kind_as_constant(
    state: &mut ParserState<'_>,
    kind: &TokenKind,
    constant: ConstantKind,
    open: &Token,
    unterminated: UnterminatedKind,
) -> ParseResult<NodeId> {
    if state.maybe_current_token().is_none() {
        return Err(match unterminated {
            UnterminatedKind::Parentheses => crate::InnerParseError::UnterminatedParentheses {
                open: open.clone(),
            },
            UnterminatedKind::Bracket => crate::InnerParseError::UnterminatedBracket {
                open: open.clone(),
            },
        });
    }
    read_token_kind_as_constant(state, kind, constant)
}

/// Read an `Identifier` leaf from an identifier or quoted-identifier token.
pub(crate) fn read_identifier(state: &mut ParserState<'_>) -> ParseResult<NodeId> {
    state.start_context(NodeKind::Identifier)?;
    match state.maybe_current_token_kind() {
        Some(TokenKind::Identifier) | Some(TokenKind::QuotedIdentifier) => {
            let literal = state
                .maybe_current_token_text()
                .unwrap_or_default()
                .to_string();
            state.advance_token();
            Ok(state.end_context(AstPayload::Identifier { literal })?)
        }
        _ => Err(state.expected_token_kind_error(TokenKind::Identifier)),
    }
}

/// Read a `GeneralizedIdentifier` leaf: record keys and field names admit
/// keywords and literals as names.
pub(crate) fn read_generalized_identifier(state: &mut ParserState<'_>) -> ParseResult<NodeId> {
    state.start_context(NodeKind::GeneralizedIdentifier)?;
    match state.maybe_current_token_kind() {
        Some(TokenKind::Identifier)
        | Some(TokenKind::QuotedIdentifier)
        | Some(TokenKind::NullLiteral)
        | Some(TokenKind::Keyword(_)) => {
            let literal = state
                .maybe_current_token_text()
                .unwrap_or_default()
                .to_string();
            state.advance_token();
            Ok(state.end_context(AstPayload::GeneralizedIdentifier { literal })?)
        }
        _ => Err(state.expected_token_kind_error(TokenKind::Identifier)),
    }
}

/// Read `Csv` elements into an `ArrayWrapper` until a terminator.
///
/// Enforces the continuation rules: a comma directly before a terminator
/// (or before `in`, for let-expressions) is an `ExpectedCsvContinuation`.
pub(crate) fn read_csv_array(
    state: &mut ParserState<'_>,
    parser: &Parser,
    read_element: &mut dyn FnMut(&mut ParserState<'_>, &Parser) -> ParseResult<NodeId>,
    is_terminator: fn(Option<&TokenKind>) -> bool,
    continuation: CsvContinuationKind,
) -> ParseResult<NodeId> {
    state.start_context(NodeKind::ArrayWrapper)?;
    loop {
        if is_terminator(state.maybe_current_token_kind()) {
            break;
        }
        state.start_context(NodeKind::Csv)?;
        read_element(state, parser)?;
        let maybe_comma =
            maybe_read_token_kind_as_constant(state, &TokenKind::Comma, ConstantKind::Comma)?;
        state.end_context(AstPayload::Composite)?;
        match maybe_comma {
            None => break,
            Some(_) => {
                if is_terminator(state.maybe_current_token_kind()) {
                    return Err(state.csv_continuation_error(continuation));
                }
            }
        }
    }
    Ok(state.end_context(AstPayload::Composite)?)
}

/// The uniform `TBinOpExpression` shape: `[left, operator, right]`.
///
/// The context opens before the left operand so ids stay ancestor-first;
/// when no operator follows, the context collapses and the operand takes
/// its place via `delete_context` reparenting.
pub(crate) fn read_bin_op_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
    kind: NodeKind,
    match_operator: fn(&TokenKind) -> Option<ConstantKind>,
    read_left: fn(&mut ParserState<'_>, &Parser) -> ParseResult<NodeId>,
    read_right: fn(&mut ParserState<'_>, &Parser) -> ParseResult<NodeId>,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(kind)?;
    let left = read_left(state, parser)?;
    let maybe_constant = state
        .maybe_current_token_kind()
        .and_then(|token_kind| match_operator(token_kind));
    let Some(constant) = maybe_constant else {
        state.delete_context()?;
        return Ok(left);
    };
    read_current_token_as_constant(state, constant)?;
    read_right(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}
