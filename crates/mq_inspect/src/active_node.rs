//! Mapping a caret to the node it is focused on.

use mq_diagnostic::CommonError;
use mq_ir::{
    ancestry, AstNode, ContextNode, NodeId, NodeIdMapCollection, NodeKind, Position, XorNode,
};
use mq_lexer::LexerSnapshot;

/// How the caret relates to the active leaf.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ActiveNodeLeafKind {
    /// Caret strictly inside a finished leaf.
    OnAstNode,
    /// Caret at or past the end of the right-most finished leaf.
    AfterAstNode,
    /// The focus is an open context: a partially parsed construct.
    ContextNode,
}

/// The identifier whose graphemes hold the caret, kept for prefix
/// filtering.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct IdentifierUnderPosition {
    pub node_id: NodeId,
    pub literal: String,
}

/// The caret's focus: the designated leaf and its full ancestry.
pub struct ActiveNode<'a> {
    pub position: Position,
    /// Leaf first, root last. Never empty.
    pub ancestry: Vec<XorNode<'a>>,
    pub leaf_kind: ActiveNodeLeafKind,
    pub maybe_identifier_under_position: Option<IdentifierUnderPosition>,
}

impl<'a> ActiveNode<'a> {
    pub fn leaf(&self) -> XorNode<'a> {
        self.ancestry[0]
    }
}

/// Resolve the caret to its active node, or `None` in an empty graph.
///
/// Selection: a finished leaf strictly containing the caret wins.
/// Otherwise the deepest open context at-or-before the caret competes
/// with the right-most finished leaf ending at-or-before it, and the
/// newer node wins: a partially parsed construct beats the completed
/// sibling it follows.
pub fn maybe_active_node<'a>(
    collection: &'a NodeIdMapCollection,
    snapshot: &LexerSnapshot,
    position: Position,
) -> Result<Option<ActiveNode<'a>>, CommonError> {
    let mut maybe_on: Option<&AstNode> = None;
    let mut maybe_after: Option<&AstNode> = None;
    for &leaf_id in collection.leaf_ids() {
        let node = collection.ast(leaf_id)?;
        let range = &node.token_range;
        if position.is_after(&range.position_start) && position.is_before(&range.position_end) {
            maybe_on = Some(node);
        }
        if position.is_on_or_after(&range.position_end) {
            let replaces = match maybe_after {
                Some(current) => {
                    range.token_index_start > current.token_range.token_index_start
                }
                None => true,
            };
            if replaces {
                maybe_after = Some(node);
            }
        }
    }

    let mut maybe_context: Option<&ContextNode> = None;
    for id in collection.context_ids() {
        let node = collection.context(id)?;
        let start = node
            .maybe_token_start
            .as_ref()
            .map(|token| token.position_start)
            .unwrap_or_else(|| snapshot.end_position());
        if position.is_on_or_after(&start) {
            let replaces = match maybe_context {
                Some(current) => node.id > current.id,
                None => true,
            };
            if replaces {
                maybe_context = Some(node);
            }
        }
    }

    let (leaf_id, leaf_kind) = if let Some(node) = maybe_on {
        (node.id, ActiveNodeLeafKind::OnAstNode)
    } else {
        match (maybe_context, maybe_after) {
            (Some(context), Some(after)) if context.id > after.id => {
                (context.id, ActiveNodeLeafKind::ContextNode)
            }
            (Some(context), None) => (context.id, ActiveNodeLeafKind::ContextNode),
            (_, Some(after)) => (after.id, ActiveNodeLeafKind::AfterAstNode),
            (None, None) => return Ok(None),
        }
    };

    Ok(Some(ActiveNode {
        position,
        ancestry: ancestry(collection, leaf_id)?,
        leaf_kind,
        maybe_identifier_under_position: identifier_under_position(collection, position)?,
    }))
}

fn identifier_under_position(
    collection: &NodeIdMapCollection,
    position: Position,
) -> Result<Option<IdentifierUnderPosition>, CommonError> {
    for &leaf_id in collection.leaf_ids() {
        let node = collection.ast(leaf_id)?;
        if !matches!(
            node.kind,
            NodeKind::Identifier | NodeKind::GeneralizedIdentifier
        ) {
            continue;
        }
        let range = &node.token_range;
        if position.is_after(&range.position_start) && position.is_on_or_before(&range.position_end)
        {
            if let Some(text) = node.maybe_leaf_text() {
                return Ok(Some(IdentifierUnderPosition {
                    node_id: node.id,
                    literal: text.to_string(),
                }));
            }
        }
    }
    Ok(None)
}

/// The right-most finished leaf ending at or before the caret.
pub(crate) fn right_most_leaf_before<'a>(
    collection: &'a NodeIdMapCollection,
    position: Position,
) -> Result<Option<&'a AstNode>, CommonError> {
    let mut best: Option<&AstNode> = None;
    for &leaf_id in collection.leaf_ids() {
        let node = collection.ast(leaf_id)?;
        if !position.is_on_or_after(&node.token_range.position_end) {
            continue;
        }
        let replaces = match best {
            Some(current) => {
                node.token_range.token_index_start > current.token_range.token_index_start
            }
            None => true,
        };
        if replaces {
            best = Some(node);
        }
    }
    Ok(best)
}
