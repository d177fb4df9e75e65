//! Core IR for the mq language service.
//!
//! The central structure is `NodeIdMapCollection`, the dual-mode node graph
//! that stores finished AST nodes and still-open parse contexts under one
//! integer id space. Everything downstream of the parser consumes the graph
//! through the uniform `XorNode` view and never cares whether a subtree is
//! finished.

mod ancestry;
mod ast;
mod constant;
mod context_node;
mod keyword;
mod node_id_map;
mod node_kind;
mod position;
mod span;
mod token;
mod xor_node;

pub use ancestry::{
    ancestry, assert_nth_next, assert_nth_previous, maybe_nth_next, maybe_nth_previous,
};
pub use ast::{AstNode, AstPayload, LiteralKind, NodeId, TokenRange};
pub use constant::{ConstantKind, PrimitiveTypeConstant};
pub use context_node::ContextNode;
pub use keyword::Keyword;
pub use node_id_map::NodeIdMapCollection;
pub use node_kind::NodeKind;
pub use position::{GraphemePosition, Position};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use xor_node::XorNode;
