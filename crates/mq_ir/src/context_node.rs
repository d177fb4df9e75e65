//! In-progress parse contexts.

use crate::{NodeId, NodeKind, Token};

/// A node whose production is still executing.
///
/// Shares the id space with finished nodes: when the production completes
/// the context is promoted in place, and its descendants never notice.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ContextNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Index into the token stream where the production began.
    pub token_index_start: u32,
    /// The token at `token_index_start`, absent when the production began
    /// at the end of input.
    pub maybe_token_start: Option<Token>,
    /// Child slots consumed so far, including skipped optional slots.
    pub attribute_counter: u32,
    pub maybe_parent_id: Option<NodeId>,
    /// Position among the parent's child slots; absent for the root.
    pub maybe_attribute_index: Option<u32>,
}
