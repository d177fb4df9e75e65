//! Recursive-descent parser framework for the mq language service.
//!
//! The framework is built around three ideas:
//! - productions mutate one `ParserState` whose `ContextState` holds the
//!   dual-mode node graph, so the parse is recoverable and inspectable at
//!   any point, including after an error;
//! - speculative reads capture a `FastStateBackup` and roll back by id
//!   threshold in O(delta);
//! - the production table is a plain value (`Parser`) bundling function
//!   pointers, so callers can substitute individual readers without
//!   subclassing anything.

mod backup;
mod context;
mod error;
mod grammar;
mod state;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;

pub use backup::FastStateBackup;
pub use error::{
    CsvContinuationKind, InnerParseError, ParseError, ParseOk, ParseResult, TriedParse,
};
pub use state::{ContextState, ParserState};

use mq_diagnostic::CommonError;
use mq_ir::NodeId;

/// Signature shared by every production reader.
pub type ReadNode = fn(&mut ParserState<'_>, &Parser) -> ParseResult<NodeId>;

/// The production table: one reader per grammar nonterminal.
///
/// A capability record rather than a trait object: override a field of
/// `Parser::default()` to substitute a single production while reusing the
/// rest of the driver.
#[derive(Clone, Copy)]
pub struct Parser {
    pub read_document: ReadNode,
    pub read_section_document: ReadNode,
    pub read_section_member: ReadNode,
    pub read_expression: ReadNode,
    pub read_each_expression: ReadNode,
    pub read_function_expression: ReadNode,
    pub read_parameter_list: ReadNode,
    pub read_let_expression: ReadNode,
    pub read_if_expression: ReadNode,
    pub read_error_raising_expression: ReadNode,
    pub read_error_handling_expression: ReadNode,
    pub read_unary_expression: ReadNode,
    pub read_primary_expression: ReadNode,
    pub read_literal_expression: ReadNode,
    pub read_identifier_expression: ReadNode,
    pub read_parenthesized_expression: ReadNode,
    pub read_list_expression: ReadNode,
    pub read_record_expression: ReadNode,
    pub read_not_implemented_expression: ReadNode,
    pub read_type_expression: ReadNode,
    pub read_nullable_primitive_type: ReadNode,
    pub read_primitive_type: ReadNode,
}

impl Default for Parser {
    fn default() -> Self {
        Parser {
            read_document: grammar::read_document,
            read_section_document: grammar::section::read_section_document,
            read_section_member: grammar::section::read_section_member,
            read_expression: grammar::expression::read_expression,
            read_each_expression: grammar::expression::read_each_expression,
            read_function_expression: grammar::function::read_function_expression,
            read_parameter_list: grammar::function::read_parameter_list,
            read_let_expression: grammar::expression::read_let_expression,
            read_if_expression: grammar::expression::read_if_expression,
            read_error_raising_expression: grammar::expression::read_error_raising_expression,
            read_error_handling_expression: grammar::expression::read_error_handling_expression,
            read_unary_expression: grammar::expression::read_unary_expression,
            read_primary_expression: grammar::primary::read_primary_expression,
            read_literal_expression: grammar::primary::read_literal_expression,
            read_identifier_expression: grammar::primary::read_identifier_expression,
            read_parenthesized_expression: grammar::primary::read_parenthesized_expression,
            read_list_expression: grammar::primary::read_list_expression,
            read_record_expression: grammar::primary::read_record_expression,
            read_not_implemented_expression: grammar::primary::read_not_implemented_expression,
            read_type_expression: grammar::types::read_type_expression,
            read_nullable_primitive_type: grammar::types::read_nullable_primitive_type,
            read_primitive_type: grammar::types::read_primitive_type,
        }
    }
}

/// Run `parser.read_document` inside the fault boundary.
///
/// Diagnostics thrown inside productions become an `Err` carrying the
/// *current* state, so consumers can inspect the partial tree. A
/// successful read additionally asserts that no context remains open and
/// no tokens remain unconsumed.
pub fn try_read<'a>(mut state: ParserState<'a>, parser: &Parser) -> TriedParse<'a> {
    match (parser.read_document)(&mut state, parser) {
        Ok(root) => {
            if state.maybe_current_context_id().is_some() {
                let inner = InnerParseError::Common(CommonError::invariant(
                    "a context remained open after the document completed",
                ));
                return Err(ParseError { state, inner });
            }
            if let Some(first_unused) = state.maybe_current_token().cloned() {
                let inner = InnerParseError::UnusedTokensRemain { first_unused };
                return Err(ParseError { state, inner });
            }
            tracing::debug!(
                nodes = state.node_id_map_collection().node_count(),
                leaves = state.leaf_ids().len(),
                "parse succeeded"
            );
            Ok(ParseOk { root, state })
        }
        Err(inner) => {
            tracing::debug!(code = %inner.code(), "parse failed");
            Err(ParseError { state, inner })
        }
    }
}
