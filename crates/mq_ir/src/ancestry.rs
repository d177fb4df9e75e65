//! Leaf-first ancestry walks and navigation over them.
//!
//! Every inspection algorithm consumes ancestries in the same direction:
//! index 0 is the leaf, the last element is the root.

use mq_diagnostic::{CommonError, InvariantError};

use crate::{NodeId, NodeIdMapCollection, NodeKind, XorNode};

/// Collect the path from `leaf_id` to the root, leaf first.
pub fn ancestry(
    collection: &NodeIdMapCollection,
    leaf_id: NodeId,
) -> Result<Vec<XorNode<'_>>, CommonError> {
    let mut nodes = Vec::new();
    let mut current = leaf_id;
    loop {
        nodes.push(collection.xor(current)?);
        if nodes.len() > collection.node_count() {
            return Err(InvariantError::with_details(
                "cycle in parent links",
                leaf_id.to_string(),
            )
            .into());
        }
        match collection.maybe_parent_id(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Ok(nodes)
}

/// The node `n` steps toward the root from `index`.
///
/// When `maybe_kinds` is supplied and the reached node's kind is not in the
/// allowed set the result is absent, not an error. That is what lets
/// autocomplete rules read as short declarative patterns.
pub fn maybe_nth_next<'a>(
    ancestry: &[XorNode<'a>],
    index: usize,
    n: usize,
    maybe_kinds: Option<&[NodeKind]>,
) -> Option<XorNode<'a>> {
    let node = *ancestry.get(index.checked_add(n)?)?;
    filter_by_kind(node, maybe_kinds)
}

/// The node `n` steps toward the leaf from `index`.
pub fn maybe_nth_previous<'a>(
    ancestry: &[XorNode<'a>],
    index: usize,
    n: usize,
    maybe_kinds: Option<&[NodeKind]>,
) -> Option<XorNode<'a>> {
    let node = *ancestry.get(index.checked_sub(n)?)?;
    filter_by_kind(node, maybe_kinds)
}

/// As `maybe_nth_next` without a kind filter; a missing offset is an
/// invariant violation.
pub fn assert_nth_next<'a>(
    ancestry: &[XorNode<'a>],
    index: usize,
    n: usize,
) -> Result<XorNode<'a>, CommonError> {
    maybe_nth_next(ancestry, index, n, None).ok_or_else(|| {
        InvariantError::with_details("ancestry offset out of range", format!("{index}+{n}")).into()
    })
}

/// As `maybe_nth_previous` without a kind filter; a missing offset is an
/// invariant violation.
pub fn assert_nth_previous<'a>(
    ancestry: &[XorNode<'a>],
    index: usize,
    n: usize,
) -> Result<XorNode<'a>, CommonError> {
    maybe_nth_previous(ancestry, index, n, None).ok_or_else(|| {
        InvariantError::with_details("ancestry offset out of range", format!("{index}-{n}")).into()
    })
}

fn filter_by_kind<'a>(node: XorNode<'a>, maybe_kinds: Option<&[NodeKind]>) -> Option<XorNode<'a>> {
    match maybe_kinds {
        Some(kinds) if !kinds.contains(&node.node_kind()) => None,
        _ => Some(node),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ContextNode;

    fn collection_of_chain(kinds: &[NodeKind]) -> NodeIdMapCollection {
        let mut collection = NodeIdMapCollection::new();
        for (index, &kind) in kinds.iter().enumerate() {
            let id = index as u32 + 1;
            collection.insert_context(ContextNode {
                id: NodeId(id),
                kind,
                token_index_start: 0,
                maybe_token_start: None,
                attribute_counter: 0,
                maybe_parent_id: (index > 0).then(|| NodeId(id - 1)),
                maybe_attribute_index: (index > 0).then_some(0),
            });
        }
        collection
    }

    #[test]
    fn ancestry_is_leaf_first() {
        let collection = collection_of_chain(&[
            NodeKind::LetExpression,
            NodeKind::ArrayWrapper,
            NodeKind::Csv,
        ]);
        let nodes = ancestry(&collection, NodeId(3)).unwrap();
        let kinds: Vec<NodeKind> = nodes.iter().map(|node| node.node_kind()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Csv, NodeKind::ArrayWrapper, NodeKind::LetExpression]
        );
    }

    #[test]
    fn navigation_respects_kind_filters() {
        let collection = collection_of_chain(&[
            NodeKind::LetExpression,
            NodeKind::ArrayWrapper,
            NodeKind::Csv,
        ]);
        let nodes = ancestry(&collection, NodeId(3)).unwrap();

        let next = maybe_nth_next(&nodes, 0, 1, None).unwrap();
        assert_eq!(next.node_kind(), NodeKind::ArrayWrapper);
        // A kind mismatch is absent, not an error.
        assert!(maybe_nth_next(&nodes, 0, 1, Some(&[NodeKind::Csv])).is_none());
        assert!(
            maybe_nth_next(&nodes, 0, 2, Some(&[NodeKind::LetExpression])).is_some()
        );

        let previous = maybe_nth_previous(&nodes, 2, 2, None).unwrap();
        assert_eq!(previous.node_kind(), NodeKind::Csv);
        assert!(maybe_nth_previous(&nodes, 0, 1, None).is_none());
    }

    #[test]
    fn asserting_navigation_fails_on_missing_offsets() {
        let collection = collection_of_chain(&[NodeKind::LetExpression, NodeKind::Csv]);
        let nodes = ancestry(&collection, NodeId(2)).unwrap();
        assert!(assert_nth_next(&nodes, 0, 1).is_ok());
        assert!(assert_nth_next(&nodes, 0, 2).is_err());
        assert!(assert_nth_previous(&nodes, 0, 1).is_err());
    }
}
