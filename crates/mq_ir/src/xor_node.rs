//! The uniform "either AST or context" view.

use crate::{AstNode, ContextNode, NodeId, NodeKind};

/// A node viewed without caring whether its production has finished.
///
/// This is the only shape inspection code ever dispatches on.
#[derive(Copy, Clone, Debug)]
pub enum XorNode<'a> {
    Ast(&'a AstNode),
    Context(&'a ContextNode),
}

impl<'a> XorNode<'a> {
    #[inline]
    pub fn node_id(self) -> NodeId {
        match self {
            XorNode::Ast(node) => node.id,
            XorNode::Context(node) => node.id,
        }
    }

    #[inline]
    pub fn node_kind(self) -> NodeKind {
        match self {
            XorNode::Ast(node) => node.kind,
            XorNode::Context(node) => node.kind,
        }
    }

    #[inline]
    pub fn maybe_attribute_index(self) -> Option<u32> {
        match self {
            XorNode::Ast(node) => node.maybe_attribute_index,
            XorNode::Context(node) => node.maybe_attribute_index,
        }
    }

    #[inline]
    pub fn token_index_start(self) -> u32 {
        match self {
            XorNode::Ast(node) => node.token_range.token_index_start,
            XorNode::Context(node) => node.token_index_start,
        }
    }

    #[inline]
    pub fn is_ast(self) -> bool {
        matches!(self, XorNode::Ast(_))
    }

    #[inline]
    pub fn is_context(self) -> bool {
        matches!(self, XorNode::Context(_))
    }

    #[inline]
    pub fn maybe_ast(self) -> Option<&'a AstNode> {
        match self {
            XorNode::Ast(node) => Some(node),
            XorNode::Context(_) => None,
        }
    }

    #[inline]
    pub fn maybe_context(self) -> Option<&'a ContextNode> {
        match self {
            XorNode::Ast(_) => None,
            XorNode::Context(node) => Some(node),
        }
    }
}
