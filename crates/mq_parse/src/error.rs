//! The closed parse-error taxonomy.
//!
//! Diagnostics are raised inside productions and converted exactly once,
//! at the `try_read` boundary, into a `ParseError` that carries the full
//! parser state. Partial trees stay inspectable: autocomplete runs over a
//! `ParseError` the same way it runs over a `ParseOk`.

use std::error::Error;
use std::fmt;

use mq_diagnostic::{
    CancellationError, CommonError, ErrorCode, InvariantError, LocalizationTemplates,
};
use mq_ir::{GraphemePosition, NodeId, Token, TokenKind};

use crate::ParserState;

/// Which comma rule a CSV continuation error violated.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CsvContinuationKind {
    /// A comma directly before a terminator.
    DanglingComma,
    /// A comma directly before the `in` of a let-expression.
    LetExpression,
}

/// A diagnostic raised inside a production.
#[derive(Clone, PartialEq, Debug)]
pub enum InnerParseError {
    ExpectedTokenKind {
        expected: TokenKind,
        maybe_found: Option<Token>,
    },
    ExpectedAnyTokenKind {
        expected: Vec<TokenKind>,
        maybe_found: Option<Token>,
    },
    ExpectedCsvContinuation {
        kind: CsvContinuationKind,
        maybe_found: Option<Token>,
    },
    UnusedTokensRemain {
        first_unused: Token,
    },
    UnterminatedParentheses {
        open: Token,
    },
    UnterminatedBracket {
        open: Token,
    },
    InvalidPrimitiveType {
        token: Token,
        text: String,
    },
    RequiredParameterAfterOptionalParameter {
        maybe_token: Option<Token>,
    },
    /// Cancellation or an invariant violation surfacing through the parse.
    Common(CommonError),
}

impl InnerParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            InnerParseError::ExpectedTokenKind { .. } => ErrorCode::P1001,
            InnerParseError::ExpectedAnyTokenKind { .. } => ErrorCode::P1002,
            InnerParseError::ExpectedCsvContinuation { .. } => ErrorCode::P1003,
            InnerParseError::UnusedTokensRemain { .. } => ErrorCode::P1004,
            InnerParseError::UnterminatedParentheses { .. } => ErrorCode::P1005,
            InnerParseError::UnterminatedBracket { .. } => ErrorCode::P1006,
            InnerParseError::InvalidPrimitiveType { .. } => ErrorCode::P1007,
            InnerParseError::RequiredParameterAfterOptionalParameter { .. } => ErrorCode::P1008,
            InnerParseError::Common(common) => common.code(),
        }
    }

    /// The offending token, when one exists. This is also what the
    /// autocomplete pipeline treats as the trailing token.
    pub fn maybe_token(&self) -> Option<&Token> {
        match self {
            InnerParseError::ExpectedTokenKind { maybe_found, .. }
            | InnerParseError::ExpectedAnyTokenKind { maybe_found, .. }
            | InnerParseError::ExpectedCsvContinuation { maybe_found, .. }
            | InnerParseError::RequiredParameterAfterOptionalParameter {
                maybe_token: maybe_found,
            } => maybe_found.as_ref(),
            InnerParseError::UnusedTokensRemain { first_unused } => Some(first_unused),
            InnerParseError::UnterminatedParentheses { open }
            | InnerParseError::UnterminatedBracket { open } => Some(open),
            InnerParseError::InvalidPrimitiveType { token, .. } => Some(token),
            InnerParseError::Common(_) => None,
        }
    }

    pub fn maybe_position(&self) -> Option<GraphemePosition> {
        self.maybe_token().map(|token| token.position_start)
    }

    /// Format through a message dictionary.
    pub fn message(&self, templates: &LocalizationTemplates) -> String {
        let found = |maybe_token: &Option<Token>| -> &'static str {
            match maybe_token {
                Some(token) => token.kind.display_name(),
                None => templates.end_of_input,
            }
        };
        match self {
            InnerParseError::ExpectedTokenKind {
                expected,
                maybe_found,
            } => LocalizationTemplates::apply(
                templates.expected_token_kind,
                &[expected.display_name(), found(maybe_found)],
            ),
            InnerParseError::ExpectedAnyTokenKind {
                expected,
                maybe_found,
            } => {
                let names = expected
                    .iter()
                    .map(TokenKind::display_name)
                    .collect::<Vec<_>>()
                    .join(", ");
                LocalizationTemplates::apply(
                    templates.expected_any_token_kind,
                    &[&names, found(maybe_found)],
                )
            }
            InnerParseError::ExpectedCsvContinuation { kind, maybe_found } => match kind {
                CsvContinuationKind::DanglingComma => LocalizationTemplates::apply(
                    templates.csv_continuation_dangling_comma,
                    &[found(maybe_found)],
                ),
                CsvContinuationKind::LetExpression => {
                    templates.csv_continuation_let.to_string()
                }
            },
            InnerParseError::UnusedTokensRemain { first_unused } => LocalizationTemplates::apply(
                templates.unused_tokens_remain,
                &[first_unused.kind.display_name()],
            ),
            InnerParseError::UnterminatedParentheses { open } => LocalizationTemplates::apply(
                templates.unterminated_parentheses,
                &[&format_position(open.position_start)],
            ),
            InnerParseError::UnterminatedBracket { open } => LocalizationTemplates::apply(
                templates.unterminated_bracket,
                &[&format_position(open.position_start)],
            ),
            InnerParseError::InvalidPrimitiveType { text, .. } => {
                LocalizationTemplates::apply(templates.invalid_primitive_type, &[text])
            }
            InnerParseError::RequiredParameterAfterOptionalParameter { .. } => {
                templates.required_parameter_after_optional.to_string()
            }
            InnerParseError::Common(common) => common.to_string(),
        }
    }
}

fn format_position(position: GraphemePosition) -> String {
    format!(
        "line {}, column {}",
        position.line_number, position.line_code_unit
    )
}

impl fmt::Display for InnerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.code(),
            self.message(LocalizationTemplates::en())
        )
    }
}

impl Error for InnerParseError {}

impl From<CommonError> for InnerParseError {
    fn from(inner: CommonError) -> Self {
        InnerParseError::Common(inner)
    }
}

impl From<InvariantError> for InnerParseError {
    fn from(inner: InvariantError) -> Self {
        InnerParseError::Common(CommonError::Invariant(inner))
    }
}

impl From<CancellationError> for InnerParseError {
    fn from(inner: CancellationError) -> Self {
        InnerParseError::Common(CommonError::Cancellation(inner))
    }
}

/// A failed parse, with the state kept for post-mortem inspection.
pub struct ParseError<'a> {
    pub state: ParserState<'a>,
    pub inner: InnerParseError,
}

impl ParseError<'_> {
    /// Grapheme-accurate column of the offending token.
    pub fn maybe_column_number(&self) -> Option<u32> {
        self.inner
            .maybe_token()
            .map(|token| self.state.lexer_snapshot().column_number_start_of(token))
    }

    pub fn message(&self) -> String {
        self.inner.message(self.state.templates())
    }
}

impl fmt::Debug for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("inner", &self.inner)
            .field("state", &self.state)
            .finish()
    }
}

/// A successful parse: the root node plus everything the parse built.
pub struct ParseOk<'a> {
    pub root: NodeId,
    pub state: ParserState<'a>,
}

impl ParseOk<'_> {
    pub fn node_id_map_collection(&self) -> &mq_ir::NodeIdMapCollection {
        self.state.node_id_map_collection()
    }

    pub fn leaf_ids(&self) -> &[NodeId] {
        self.state.leaf_ids()
    }
}

impl fmt::Debug for ParseOk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOk")
            .field("root", &self.root)
            .field("state", &self.state)
            .finish()
    }
}

/// The result sum of `try_read`.
pub type TriedParse<'a> = Result<ParseOk<'a>, ParseError<'a>>;

/// The result type of every production.
pub type ParseResult<T> = Result<T, InnerParseError>;

// --- Error constructors capturing the current token ---

impl ParserState<'_> {
    #[cold]
    pub(crate) fn expected_token_kind_error(&self, expected: TokenKind) -> InnerParseError {
        InnerParseError::ExpectedTokenKind {
            expected,
            maybe_found: self.maybe_current_token().cloned(),
        }
    }

    #[cold]
    pub(crate) fn expected_any_token_kind_error(
        &self,
        expected: Vec<TokenKind>,
    ) -> InnerParseError {
        InnerParseError::ExpectedAnyTokenKind {
            expected,
            maybe_found: self.maybe_current_token().cloned(),
        }
    }

    #[cold]
    pub(crate) fn csv_continuation_error(&self, kind: CsvContinuationKind) -> InnerParseError {
        InnerParseError::ExpectedCsvContinuation {
            kind,
            maybe_found: self.maybe_current_token().cloned(),
        }
    }

    #[cold]
    pub(crate) fn invalid_primitive_type_error(&self, token: &Token) -> InnerParseError {
        InnerParseError::InvalidPrimitiveType {
            token: token.clone(),
            text: self.lexer_snapshot().token_text(token).to_string(),
        }
    }

    #[cold]
    pub(crate) fn required_parameter_error(&self) -> InnerParseError {
        InnerParseError::RequiredParameterAfterOptionalParameter {
            maybe_token: self.maybe_current_token().cloned(),
        }
    }
}
