//! Parser state: token navigation plus the parse-context state.

use std::fmt;

use mq_diagnostic::{CancellationToken, CommonError, LocalizationTemplates};
use mq_ir::{NodeId, NodeIdMapCollection, Token, TokenKind};
use mq_lexer::LexerSnapshot;

/// Lifecycle state of the open-context stack and the dual-mode graph.
///
/// Owned by exactly one parser state; never shared while parsing.
#[derive(Clone, Default, Debug)]
pub struct ContextState {
    pub node_id_map_collection: NodeIdMapCollection,
    /// The single monotonic id allocator. Rollback-by-threshold depends on
    /// ids never being reused within a parse.
    pub id_counter: u32,
    pub maybe_root_id: Option<NodeId>,
    pub maybe_current_context_id: Option<NodeId>,
}

/// All mutable state of one parse.
pub struct ParserState<'a> {
    lexer_snapshot: &'a LexerSnapshot,
    templates: &'a LocalizationTemplates,
    maybe_cancellation_token: Option<&'a dyn CancellationToken>,
    token_index: usize,
    pub(crate) context_state: ContextState,
}

impl<'a> ParserState<'a> {
    pub fn new(
        lexer_snapshot: &'a LexerSnapshot,
        templates: &'a LocalizationTemplates,
        maybe_cancellation_token: Option<&'a dyn CancellationToken>,
    ) -> Self {
        ParserState {
            lexer_snapshot,
            templates,
            maybe_cancellation_token,
            token_index: 0,
            context_state: ContextState::default(),
        }
    }

    pub fn lexer_snapshot(&self) -> &'a LexerSnapshot {
        self.lexer_snapshot
    }

    pub fn templates(&self) -> &'a LocalizationTemplates {
        self.templates
    }

    pub fn context_state(&self) -> &ContextState {
        &self.context_state
    }

    pub fn node_id_map_collection(&self) -> &NodeIdMapCollection {
        &self.context_state.node_id_map_collection
    }

    pub fn leaf_ids(&self) -> &[NodeId] {
        self.context_state.node_id_map_collection.leaf_ids()
    }

    pub fn maybe_current_context_id(&self) -> Option<NodeId> {
        self.context_state.maybe_current_context_id
    }

    /// Poll the cancellation token; called at every production entry.
    #[inline]
    pub fn check_cancellation(&self) -> Result<(), CommonError> {
        match self.maybe_cancellation_token {
            Some(token) => token.check().map_err(CommonError::from),
            None => Ok(()),
        }
    }

    // --- Token navigation ---

    #[inline]
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    pub(crate) fn set_token_index(&mut self, token_index: usize) {
        self.token_index = token_index;
    }

    #[inline]
    pub fn maybe_current_token(&self) -> Option<&'a Token> {
        self.lexer_snapshot.maybe_token(self.token_index)
    }

    #[inline]
    pub fn maybe_current_token_kind(&self) -> Option<&'a TokenKind> {
        self.maybe_current_token().map(|token| &token.kind)
    }

    #[inline]
    pub fn is_on_token_kind(&self, kind: &TokenKind) -> bool {
        self.maybe_current_token_kind() == Some(kind)
    }

    /// One-or-more token lookahead.
    pub fn maybe_nth_token_kind(&self, offset: usize) -> Option<&'a TokenKind> {
        self.lexer_snapshot
            .maybe_token(self.token_index + offset)
            .map(|token| &token.kind)
    }

    /// The source spelling of the current token.
    pub fn maybe_current_token_text(&self) -> Option<&'a str> {
        self.maybe_current_token()
            .map(|token| self.lexer_snapshot.token_text(token))
    }

    /// Consume the current token. Callers check the kind first.
    pub(crate) fn advance_token(&mut self) -> Option<&'a Token> {
        let token = self.lexer_snapshot.maybe_token(self.token_index)?;
        self.token_index += 1;
        Some(token)
    }
}

impl fmt::Debug for ParserState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserState")
            .field("token_index", &self.token_index)
            .field("id_counter", &self.context_state.id_counter)
            .field(
                "maybe_current_context_id",
                &self.context_state.maybe_current_context_id,
            )
            .finish_non_exhaustive()
    }
}
