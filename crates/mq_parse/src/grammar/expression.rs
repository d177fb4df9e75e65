//! Expressions: keyword-led forms and the binary-operator tier chain.

use mq_ir::{AstPayload, ConstantKind, Keyword, NodeId, NodeKind, TokenKind};

use crate::error::CsvContinuationKind;
use crate::grammar::helpers::{
    read_bin_op_expression, read_csv_array, read_current_token_as_constant, read_identifier,
    read_token_kind_as_constant,
};
use crate::{ParseResult, Parser, ParserState};

pub(crate) fn read_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    match state.maybe_current_token_kind() {
        Some(TokenKind::Keyword(Keyword::Each)) => (parser.read_each_expression)(state, parser),
        Some(TokenKind::Keyword(Keyword::Let)) => (parser.read_let_expression)(state, parser),
        Some(TokenKind::Keyword(Keyword::If)) => (parser.read_if_expression)(state, parser),
        Some(TokenKind::Keyword(Keyword::Error)) => {
            (parser.read_error_raising_expression)(state, parser)
        }
        Some(TokenKind::Keyword(Keyword::Try)) => {
            (parser.read_error_handling_expression)(state, parser)
        }
        Some(TokenKind::LeftParenthesis) => read_ambiguous_parenthesis(state, parser),
        _ => read_logical_or_expression(state, parser),
    }
}

/// `(x) => …` vs `(x) + 1`: scan to the matching `)` and look for `=>`.
///
/// An unterminated scan falls back to a speculative function read over a
/// fast state backup, rolling back exactly the failed branch.
fn read_ambiguous_parenthesis(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    match scan_for_function_arrow(state) {
        Some(true) => (parser.read_function_expression)(state, parser),
        Some(false) => read_logical_or_expression(state, parser),
        None => {
            tracing::trace!("unterminated `(`; disambiguating by speculative read");
            let backup = state.fast_state_backup();
            match (parser.read_function_expression)(state, parser) {
                Ok(id) => Ok(id),
                Err(_) => {
                    state.apply_fast_state_backup(&backup)?;
                    read_logical_or_expression(state, parser)
                }
            }
        }
    }
}

/// `Some(true)` when the parenthesis closes and `=>` follows, `None` when
/// it never closes.
fn scan_for_function_arrow(state: &ParserState<'_>) -> Option<bool> {
    let tokens = state.lexer_snapshot().tokens();
    let mut depth = 0usize;
    let mut index = state.token_index();
    while let Some(token) = tokens.get(index) {
        match token.kind {
            TokenKind::LeftParenthesis => depth += 1,
            TokenKind::RightParenthesis => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let follows = matches!(
                        tokens.get(index + 1).map(|next| &next.kind),
                        Some(TokenKind::FatArrow)
                    );
                    return Some(follows);
                }
            }
            _ => {}
        }
        index += 1;
    }
    None
}

// --- Keyword-led expressions ---

pub(crate) fn read_each_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::EachExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Each), ConstantKind::Each)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_let_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::LetExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Let), ConstantKind::Let)?;
    read_csv_array(
        state,
        parser,
        &mut read_identifier_paired_expression,
        |kind| matches!(kind, None | Some(TokenKind::Keyword(Keyword::In))),
        CsvContinuationKind::LetExpression,
    )?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::In), ConstantKind::In)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_if_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::IfExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::If), ConstantKind::If)?;
    (parser.read_expression)(state, parser)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Then), ConstantKind::Then)?;
    (parser.read_expression)(state, parser)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Else), ConstantKind::Else)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_error_raising_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ErrorRaisingExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Error), ConstantKind::Error)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

pub(crate) fn read_error_handling_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::ErrorHandlingExpression)?;
    read_token_kind_as_constant(state, &TokenKind::Keyword(Keyword::Try), ConstantKind::Try)?;
    (parser.read_expression)(state, parser)?;
    if state.is_on_token_kind(&TokenKind::Keyword(Keyword::Otherwise)) {
        state.start_context(NodeKind::OtherwiseExpression)?;
        read_current_token_as_constant(state, ConstantKind::Otherwise)?;
        (parser.read_expression)(state, parser)?;
        state.end_context(AstPayload::Composite)?;
    } else {
        state.increment_attribute_counter()?;
    }
    Ok(state.end_context(AstPayload::Composite)?)
}

/// `name = expression`, the let-expression and section-member pair.
pub(crate) fn read_identifier_paired_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    state.start_context(NodeKind::IdentifierPairedExpression)?;
    read_identifier(state)?;
    read_token_kind_as_constant(state, &TokenKind::Equal, ConstantKind::Equal)?;
    (parser.read_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

// --- The binary-operator tier chain ---
//
// expression → or → and → is → as → equality → relational → additive
// → multiplicative → metadata → unary → primary. Each tier shares the
// three-child TBinOpExpression shape.

pub(crate) fn read_logical_or_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::LogicalExpression,
        match_or,
        read_logical_and_expression,
        read_logical_or_expression,
    )
}

fn read_logical_and_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::LogicalExpression,
        match_and,
        read_is_expression,
        read_logical_and_expression,
    )
}

fn read_is_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::IsExpression,
        match_is,
        read_as_expression,
        call_read_nullable_primitive_type,
    )
}

fn read_as_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::AsExpression,
        match_as,
        read_equality_expression,
        call_read_nullable_primitive_type,
    )
}

fn read_equality_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::EqualityExpression,
        match_equality,
        read_relational_expression,
        read_equality_expression,
    )
}

fn read_relational_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::RelationalExpression,
        match_relational,
        read_additive_expression,
        read_relational_expression,
    )
}

fn read_additive_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::ArithmeticExpression,
        match_additive,
        read_multiplicative_expression,
        read_additive_expression,
    )
}

fn read_multiplicative_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::ArithmeticExpression,
        match_multiplicative,
        read_metadata_expression,
        read_multiplicative_expression,
    )
}

fn read_metadata_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    read_bin_op_expression(
        state,
        parser,
        NodeKind::MetadataExpression,
        match_meta,
        call_read_unary_expression,
        call_read_unary_expression,
    )
}

fn call_read_unary_expression(state: &mut ParserState<'_>, parser: &Parser) -> ParseResult<NodeId> {
    (parser.read_unary_expression)(state, parser)
}

fn call_read_nullable_primitive_type(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    (parser.read_nullable_primitive_type)(state, parser)
}

pub(crate) fn read_unary_expression(
    state: &mut ParserState<'_>,
    parser: &Parser,
) -> ParseResult<NodeId> {
    state.check_cancellation()?;
    let Some(constant) = state.maybe_current_token_kind().and_then(match_unary) else {
        return (parser.read_type_expression)(state, parser);
    };
    state.start_context(NodeKind::UnaryExpression)?;
    state.start_context(NodeKind::ArrayWrapper)?;
    read_current_token_as_constant(state, constant)?;
    while let Some(next) = state.maybe_current_token_kind().and_then(match_unary) {
        read_current_token_as_constant(state, next)?;
    }
    state.end_context(AstPayload::Composite)?;
    (parser.read_type_expression)(state, parser)?;
    Ok(state.end_context(AstPayload::Composite)?)
}

// --- Operator matchers ---

fn match_or(kind: &TokenKind) -> Option<ConstantKind> {
    matches!(kind, TokenKind::Keyword(Keyword::Or)).then_some(ConstantKind::Or)
}

fn match_and(kind: &TokenKind) -> Option<ConstantKind> {
    matches!(kind, TokenKind::Keyword(Keyword::And)).then_some(ConstantKind::And)
}

fn match_is(kind: &TokenKind) -> Option<ConstantKind> {
    matches!(kind, TokenKind::Keyword(Keyword::Is)).then_some(ConstantKind::Is)
}

fn match_as(kind: &TokenKind) -> Option<ConstantKind> {
    matches!(kind, TokenKind::Keyword(Keyword::As)).then_some(ConstantKind::As)
}

fn match_meta(kind: &TokenKind) -> Option<ConstantKind> {
    matches!(kind, TokenKind::Keyword(Keyword::Meta)).then_some(ConstantKind::Meta)
}

fn match_equality(kind: &TokenKind) -> Option<ConstantKind> {
    match kind {
        TokenKind::Equal => Some(ConstantKind::Equal),
        TokenKind::NotEqual => Some(ConstantKind::NotEqual),
        _ => None,
    }
}

fn match_relational(kind: &TokenKind) -> Option<ConstantKind> {
    match kind {
        TokenKind::LessThan => Some(ConstantKind::LessThan),
        TokenKind::LessThanEqualTo => Some(ConstantKind::LessThanEqualTo),
        TokenKind::GreaterThan => Some(ConstantKind::GreaterThan),
        TokenKind::GreaterThanEqualTo => Some(ConstantKind::GreaterThanEqualTo),
        _ => None,
    }
}

fn match_additive(kind: &TokenKind) -> Option<ConstantKind> {
    match kind {
        TokenKind::Plus => Some(ConstantKind::Plus),
        TokenKind::Minus => Some(ConstantKind::Minus),
        TokenKind::Ampersand => Some(ConstantKind::Ampersand),
        _ => None,
    }
}

fn match_multiplicative(kind: &TokenKind) -> Option<ConstantKind> {
    match kind {
        TokenKind::Asterisk => Some(ConstantKind::Asterisk),
        TokenKind::Division => Some(ConstantKind::Division),
        _ => None,
    }
}

fn match_unary(kind: &TokenKind) -> Option<ConstantKind> {
    match kind {
        TokenKind::Plus => Some(ConstantKind::Plus),
        TokenKind::Minus => Some(ConstantKind::Minus),
        TokenKind::Keyword(Keyword::Not) => Some(ConstantKind::Not),
        _ => None,
    }
}
