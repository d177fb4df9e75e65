//! Finished AST nodes.

use std::fmt;

use crate::{ConstantKind, GraphemePosition, NodeKind, PrimitiveTypeConstant};

/// Identity of a node in the dual-mode graph.
///
/// Ids are allocated by a single monotonic counter per parse; the
/// rollback-by-threshold algorithm depends on that ordering.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The token window a finished node covers.
///
/// `token_index_end` is exclusive. An empty window (a wrapper around zero
/// elements) has equal start/end indices and equal boundary positions.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TokenRange {
    pub token_index_start: u32,
    pub token_index_end: u32,
    pub position_start: GraphemePosition,
    pub position_end: GraphemePosition,
}

/// The literal families of `LiteralExpression`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LiteralKind {
    Logical,
    Null,
    Numeric,
    Text,
}

/// Kind-specific payload of a finished node.
///
/// Only terminal nodes carry data; interior structure lives exclusively in
/// the collection's child-id lists, so the graph has a single source of
/// truth for parentage and ordering.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AstPayload {
    Constant(ConstantKind),
    Literal {
        literal: String,
        literal_kind: LiteralKind,
    },
    Identifier {
        literal: String,
    },
    GeneralizedIdentifier {
        literal: String,
    },
    PrimitiveType(PrimitiveTypeConstant),
    /// Interior node; children are in the id map.
    Composite,
}

impl AstPayload {
    /// Whether this payload is legal for a node of `kind`.
    pub fn matches_kind(&self, kind: NodeKind) -> bool {
        match self {
            AstPayload::Constant(_) => kind == NodeKind::Constant,
            AstPayload::Literal { .. } => kind == NodeKind::LiteralExpression,
            AstPayload::Identifier { .. } => kind == NodeKind::Identifier,
            AstPayload::GeneralizedIdentifier { .. } => kind == NodeKind::GeneralizedIdentifier,
            AstPayload::PrimitiveType(_) => kind == NodeKind::PrimitiveType,
            AstPayload::Composite => !kind.is_leaf(),
        }
    }
}

/// An immutable finished syntax node.
///
/// Produced only at context promotion; the id, parent, and position among
/// siblings are exactly those of the context it replaces.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Position among the parent's child slots; absent for the root.
    pub maybe_attribute_index: Option<u32>,
    pub token_range: TokenRange,
    pub payload: AstPayload,
}

impl AstNode {
    /// The source spelling of a terminal node.
    pub fn maybe_leaf_text(&self) -> Option<&str> {
        match &self.payload {
            AstPayload::Constant(constant) => Some(constant.as_str()),
            AstPayload::Literal { literal, .. } => Some(literal),
            AstPayload::Identifier { literal } => Some(literal),
            AstPayload::GeneralizedIdentifier { literal } => Some(literal),
            AstPayload::PrimitiveType(primitive) => Some(primitive.as_str()),
            AstPayload::Composite => None,
        }
    }
}
