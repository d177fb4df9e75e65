//! Parse-context lifecycle: start, promote, delete.
//!
//! Contexts are the open half of the dual-mode graph. A production starts
//! one, reads its children into it, and either promotes it in place to the
//! finished node or deletes it, reparenting any children it had adopted.

use mq_diagnostic::{CommonError, InvariantError};
use mq_ir::{AstNode, AstPayload, ContextNode, NodeId, NodeKind, TokenRange};

use crate::ParserState;

impl ParserState<'_> {
    fn next_node_id(&mut self) -> NodeId {
        self.context_state.id_counter += 1;
        NodeId(self.context_state.id_counter)
    }

    /// Open a context of `kind` at the current token, as the next child of
    /// the current context.
    pub fn start_context(&mut self, kind: NodeKind) -> Result<NodeId, CommonError> {
        let id = self.next_node_id();
        let maybe_parent_id = self.context_state.maybe_current_context_id;
        let maybe_attribute_index = match maybe_parent_id {
            Some(parent) => Some(
                self.context_state
                    .node_id_map_collection
                    .increment_attribute_counter(parent)?,
            ),
            None => None,
        };
        let node = ContextNode {
            id,
            kind,
            token_index_start: self.token_index() as u32,
            maybe_token_start: self.maybe_current_token().cloned(),
            attribute_counter: 0,
            maybe_parent_id,
            maybe_attribute_index,
        };
        self.context_state.node_id_map_collection.insert_context(node);
        if self.context_state.maybe_root_id.is_none() {
            self.context_state.maybe_root_id = Some(id);
        }
        self.context_state.maybe_current_context_id = Some(id);
        Ok(id)
    }

    /// Promote the current context to the finished node occupying its id.
    ///
    /// The node's token range covers everything read since the context
    /// started; parent, children, and sibling position are untouched.
    pub fn end_context(&mut self, payload: AstPayload) -> Result<NodeId, CommonError> {
        let id = self
            .context_state
            .maybe_current_context_id
            .ok_or_else(|| CommonError::invariant("ending a context when none is open"))?;
        let context = self.context_state.node_id_map_collection.context(id)?.clone();
        if !payload.matches_kind(context.kind) {
            return Err(InvariantError::with_details(
                "payload does not fit the node kind",
                format!("{} at {id}", context.kind),
            )
            .into());
        }
        let node = AstNode {
            id,
            kind: context.kind,
            maybe_attribute_index: context.maybe_attribute_index,
            token_range: self.token_range_from(context.token_index_start as usize),
            payload,
        };
        self.context_state.node_id_map_collection.promote_context(node)?;
        self.context_state.maybe_current_context_id = context.maybe_parent_id;
        Ok(id)
    }

    /// Abandon the current context.
    ///
    /// Children are reparented into the deleted node's slot, preserving
    /// order; a sole child inherits its attribute index. Returns the new
    /// current context.
    pub fn delete_context(&mut self) -> Result<Option<NodeId>, CommonError> {
        let id = self
            .context_state
            .maybe_current_context_id
            .ok_or_else(|| CommonError::invariant("deleting a context when none is open"))?;
        let maybe_parent = self.context_state.node_id_map_collection.maybe_parent_id(id);
        let children = self
            .context_state
            .node_id_map_collection
            .delete_context_node(id, false)?;
        self.context_state.maybe_current_context_id = maybe_parent;
        if self.context_state.maybe_root_id == Some(id) {
            self.context_state.maybe_root_id = match children[..] {
                [sole_child] => Some(sole_child),
                _ => None,
            };
        }
        Ok(maybe_parent)
    }

    /// Record a skipped optional child slot on the current context.
    pub fn increment_attribute_counter(&mut self) -> Result<(), CommonError> {
        let id = self
            .context_state
            .maybe_current_context_id
            .ok_or_else(|| CommonError::invariant("no open context to advance"))?;
        self.context_state
            .node_id_map_collection
            .increment_attribute_counter(id)?;
        Ok(())
    }

    fn token_range_from(&self, token_index_start: usize) -> TokenRange {
        let snapshot = self.lexer_snapshot();
        let token_index_end = self.token_index();
        if token_index_end > token_index_start {
            // Both indices are in bounds: the production consumed them.
            let position_start = snapshot
                .maybe_token(token_index_start)
                .map(|token| token.position_start)
                .unwrap_or_else(|| snapshot.end_position());
            let position_end = snapshot
                .maybe_token(token_index_end - 1)
                .map(|token| token.position_end)
                .unwrap_or_else(|| snapshot.end_position());
            TokenRange {
                token_index_start: token_index_start as u32,
                token_index_end: token_index_end as u32,
                position_start,
                position_end,
            }
        } else {
            // Zero tokens consumed: a wrapper around no elements.
            let position = snapshot
                .maybe_token(token_index_start)
                .map(|token| token.position_start)
                .unwrap_or_else(|| snapshot.end_position());
            TokenRange {
                token_index_start: token_index_start as u32,
                token_index_end: token_index_start as u32,
                position_start: position,
                position_end: position,
            }
        }
    }
}
