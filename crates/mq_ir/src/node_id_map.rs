//! The dual-mode node graph.
//!
//! Every node, finished AST node or still-open parse context, lives under
//! a single integer id. Parentage and child ordering are stored once, in
//! `parent_id_by_id` / `child_ids_by_id`, regardless of which side of the
//! graph currently holds the node.
//!
//! Mutation is driven by the parser: contexts are inserted when productions
//! start, promoted in place when they end, and deleted (with reparenting)
//! when a production collapses or a speculative read rolls back.

use rustc_hash::FxHashMap;

use mq_diagnostic::{CommonError, InvariantError};

use crate::{AstNode, ContextNode, NodeId, XorNode};

/// Value-type bundle holding the whole graph for one parse.
///
/// Not safe for concurrent mutation; after the parse completes consumers
/// treat it as immutable.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct NodeIdMapCollection {
    ast_node_by_id: FxHashMap<NodeId, AstNode>,
    context_node_by_id: FxHashMap<NodeId, ContextNode>,
    parent_id_by_id: FxHashMap<NodeId, NodeId>,
    /// Insertion order is syntactic order.
    child_ids_by_id: FxHashMap<NodeId, Vec<NodeId>>,
    /// Ids of terminal AST nodes, in promotion order.
    leaf_ids: Vec<NodeId>,
    maybe_right_most_leaf: Option<NodeId>,
}

impl NodeIdMapCollection {
    pub fn new() -> Self {
        NodeIdMapCollection::default()
    }

    // --- Accessors ---

    #[inline]
    pub fn maybe_ast(&self, id: NodeId) -> Option<&AstNode> {
        self.ast_node_by_id.get(&id)
    }

    pub fn ast(&self, id: NodeId) -> Result<&AstNode, CommonError> {
        self.maybe_ast(id).ok_or_else(|| {
            InvariantError::with_details("expected an AST node", id.to_string()).into()
        })
    }

    #[inline]
    pub fn maybe_context(&self, id: NodeId) -> Option<&ContextNode> {
        self.context_node_by_id.get(&id)
    }

    pub fn context(&self, id: NodeId) -> Result<&ContextNode, CommonError> {
        self.maybe_context(id).ok_or_else(|| {
            InvariantError::with_details("expected a context node", id.to_string()).into()
        })
    }

    /// The uniform view: whichever map holds `id`.
    pub fn maybe_xor(&self, id: NodeId) -> Option<XorNode<'_>> {
        if let Some(node) = self.ast_node_by_id.get(&id) {
            Some(XorNode::Ast(node))
        } else {
            self.context_node_by_id.get(&id).map(XorNode::Context)
        }
    }

    pub fn xor(&self, id: NodeId) -> Result<XorNode<'_>, CommonError> {
        self.maybe_xor(id)
            .ok_or_else(|| InvariantError::with_details("unknown node id", id.to_string()).into())
    }

    #[inline]
    pub fn maybe_parent_id(&self, id: NodeId) -> Option<NodeId> {
        self.parent_id_by_id.get(&id).copied()
    }

    /// Children of `id` in syntactic order; empty when none.
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.child_ids_by_id
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Children as XorNodes, in syntactic order.
    ///
    /// Missing optional slots are not stored; consumers treat absent
    /// attribute indices as unparsed.
    pub fn child_xors(&self, id: NodeId) -> Result<Vec<XorNode<'_>>, CommonError> {
        self.child_ids(id)
            .iter()
            .map(|&child| self.xor(child))
            .collect()
    }

    pub fn maybe_nth_child_xor(&self, id: NodeId, n: usize) -> Option<XorNode<'_>> {
        self.child_ids(id).get(n).and_then(|&child| self.maybe_xor(child))
    }

    pub fn leaf_ids(&self) -> &[NodeId] {
        &self.leaf_ids
    }

    pub fn maybe_right_most_leaf(&self) -> Option<&AstNode> {
        self.maybe_right_most_leaf.and_then(|id| self.maybe_ast(id))
    }

    pub fn node_count(&self) -> usize {
        self.ast_node_by_id.len() + self.context_node_by_id.len()
    }

    /// Whether either map holds `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.ast_node_by_id.contains_key(&id) || self.context_node_by_id.contains_key(&id)
    }

    pub fn ast_count(&self) -> usize {
        self.ast_node_by_id.len()
    }

    pub fn context_count(&self) -> usize {
        self.context_node_by_id.len()
    }

    pub fn context_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.context_node_by_id.keys().copied()
    }

    pub fn ast_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ast_node_by_id.keys().copied()
    }

    // --- Mutation: context lifecycle ---

    /// Insert a freshly started context, linking it under its parent.
    pub fn insert_context(&mut self, node: ContextNode) {
        if let Some(parent) = node.maybe_parent_id {
            self.parent_id_by_id.insert(node.id, parent);
            self.child_ids_by_id.entry(parent).or_default().push(node.id);
        }
        self.context_node_by_id.insert(node.id, node);
    }

    /// Promote a context to the finished node occupying the same id.
    ///
    /// The parent link, child list, and sibling position are untouched;
    /// descendants never notice the promotion.
    pub fn promote_context(&mut self, node: AstNode) -> Result<(), CommonError> {
        let context = self.context_node_by_id.remove(&node.id).ok_or_else(|| {
            InvariantError::with_details("promoting an id that is not a context", node.id.to_string())
        })?;
        if context.kind != node.kind {
            return Err(InvariantError::with_details(
                "promotion kind mismatch",
                format!("context {} vs payload {}", context.kind, node.kind),
            )
            .into());
        }
        let id = node.id;
        let is_leaf = node.kind.is_leaf();
        let token_index_start = node.token_range.token_index_start;
        self.ast_node_by_id.insert(id, node);
        if is_leaf {
            self.leaf_ids.push(id);
            let replaces = match self.maybe_right_most_leaf() {
                Some(current) => token_index_start >= current.token_range.token_index_start,
                None => true,
            };
            if replaces {
                self.maybe_right_most_leaf = Some(id);
            }
        }
        Ok(())
    }

    // --- Mutation: deletion ---

    /// Remove a finished node. The node must be childless; callers delete
    /// children before parents.
    pub fn delete_ast_node(
        &mut self,
        id: NodeId,
        parent_will_be_deleted: bool,
    ) -> Result<(), CommonError> {
        let node = self.ast_node_by_id.remove(&id).ok_or_else(|| {
            InvariantError::with_details("deleting an unknown AST node", id.to_string())
        })?;
        // Children deleted earlier in a rollback may linger in the list;
        // only live ones count.
        if self.child_ids(id).iter().any(|&child| self.contains(child)) {
            return Err(InvariantError::with_details(
                "deleting an AST node that still has children",
                id.to_string(),
            )
            .into());
        }
        self.child_ids_by_id.remove(&id);
        let maybe_parent = self.parent_id_by_id.remove(&id);
        if let Some(parent) = maybe_parent {
            if !parent_will_be_deleted {
                self.remove_child_slot(parent, id)?;
            }
        }
        if node.kind.is_leaf() {
            self.leaf_ids.retain(|leaf| *leaf != id);
            if self.maybe_right_most_leaf == Some(id) {
                self.recompute_right_most_leaf();
            }
        }
        Ok(())
    }

    /// Remove a context node.
    ///
    /// Surviving children are reparented into the deleted node's parent at
    /// the deleted node's position, preserving order; a sole child inherits
    /// the deleted node's attribute index. When the parent is itself about
    /// to be deleted the splice is skipped.
    ///
    /// Returns the reparented children.
    pub fn delete_context_node(
        &mut self,
        id: NodeId,
        parent_will_be_deleted: bool,
    ) -> Result<Vec<NodeId>, CommonError> {
        let node = self.context_node_by_id.remove(&id).ok_or_else(|| {
            InvariantError::with_details("deleting an unknown context node", id.to_string())
        })?;
        // Children already deleted (their parent was known to be doomed)
        // are dropped silently; only live ones are reparented.
        let children: Vec<NodeId> = self
            .child_ids_by_id
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .filter(|&child| self.contains(child))
            .collect();
        let maybe_parent = self.parent_id_by_id.remove(&id);

        match maybe_parent {
            Some(parent) if !parent_will_be_deleted => {
                let list = self.child_ids_by_id.get_mut(&parent).ok_or_else(|| {
                    InvariantError::with_details("parent has no child list", parent.to_string())
                })?;
                let slot = list.iter().position(|child| *child == id).ok_or_else(|| {
                    InvariantError::with_details("node missing from parent's children", id.to_string())
                })?;
                list.splice(slot..slot + 1, children.iter().copied());
            }
            _ => {}
        }

        for &child in &children {
            match maybe_parent {
                Some(parent) => {
                    self.parent_id_by_id.insert(child, parent);
                }
                None => {
                    self.parent_id_by_id.remove(&child);
                }
            }
        }
        if let [sole_child] = children[..] {
            self.set_attribute_index(sole_child, node.maybe_attribute_index)?;
        }
        Ok(children)
    }

    /// Ids strictly greater than `threshold`, split by which map holds
    /// them, each sorted descending. The rollback order: AST ids first,
    /// then context ids, children before parents.
    pub fn ids_above(&self, threshold: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut ast_ids: Vec<NodeId> = self
            .ast_node_by_id
            .keys()
            .copied()
            .filter(|id| *id > threshold)
            .collect();
        let mut context_ids: Vec<NodeId> = self
            .context_node_by_id
            .keys()
            .copied()
            .filter(|id| *id > threshold)
            .collect();
        ast_ids.sort_unstable_by(|a, b| b.cmp(a));
        context_ids.sort_unstable_by(|a, b| b.cmp(a));
        (ast_ids, context_ids)
    }

    // --- Shared helpers ---

    /// Rewrite the attribute index on whichever map holds `id`.
    pub fn set_attribute_index(
        &mut self,
        id: NodeId,
        maybe_attribute_index: Option<u32>,
    ) -> Result<(), CommonError> {
        if let Some(node) = self.ast_node_by_id.get_mut(&id) {
            node.maybe_attribute_index = maybe_attribute_index;
            Ok(())
        } else if let Some(node) = self.context_node_by_id.get_mut(&id) {
            node.maybe_attribute_index = maybe_attribute_index;
            Ok(())
        } else {
            Err(InvariantError::with_details("unknown node id", id.to_string()).into())
        }
    }

    /// Bump the attribute counter of an open context.
    pub fn increment_attribute_counter(&mut self, id: NodeId) -> Result<u32, CommonError> {
        let node = self.context_node_by_id.get_mut(&id).ok_or_else(|| {
            InvariantError::with_details("expected a context node", id.to_string())
        })?;
        let index = node.attribute_counter;
        node.attribute_counter += 1;
        Ok(index)
    }

    /// Replace `old` with `new` in `parent`'s child list, preserving the
    /// slot's position.
    pub fn replace_child_slot(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), CommonError> {
        let list = self.child_ids_by_id.get_mut(&parent).ok_or_else(|| {
            InvariantError::with_details("parent has no child list", parent.to_string())
        })?;
        let slot = list.iter().position(|child| *child == old).ok_or_else(|| {
            InvariantError::with_details("node missing from parent's children", old.to_string())
        })?;
        list[slot] = new;
        Ok(())
    }

    fn remove_child_slot(&mut self, parent: NodeId, child: NodeId) -> Result<(), CommonError> {
        let list = self.child_ids_by_id.get_mut(&parent).ok_or_else(|| {
            InvariantError::with_details("parent has no child list", parent.to_string())
        })?;
        let slot = list.iter().position(|id| *id == child).ok_or_else(|| {
            InvariantError::with_details("node missing from parent's children", child.to_string())
        })?;
        list.remove(slot);
        Ok(())
    }

    fn recompute_right_most_leaf(&mut self) {
        self.maybe_right_most_leaf = self
            .leaf_ids
            .iter()
            .copied()
            .max_by_key(|id| {
                self.maybe_ast(*id)
                    .map(|node| node.token_range.token_index_start)
                    .unwrap_or(0)
            });
    }
}
