//! Caret-driven inspection over the dual-mode node graph.
//!
//! Everything here is best-effort: malformed input never fails an
//! inspection, it only narrows what can be said. The only errors these
//! functions return are invariant violations in the graph itself.

mod active_node;
mod autocomplete;
mod expected_type;
mod operator_table;
mod type_inference;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;

pub use active_node::{
    maybe_active_node, ActiveNode, ActiveNodeLeafKind, IdentifierUnderPosition,
};
pub use autocomplete::{autocomplete, Autocomplete, TrailingToken};
pub use expected_type::try_expected_type;
pub use operator_table::BinOp;
pub use type_inference::TypeInspector;
