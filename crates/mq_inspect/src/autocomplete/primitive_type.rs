//! Primitive-type autocomplete.
//!
//! Returns the full primitive-type-name list whenever the ancestry shows
//! an unfilled type slot, then prefix-filters by whatever the user has
//! typed at the caret.

use mq_diagnostic::CommonError;
use mq_ir::{NodeIdMapCollection, NodeKind, PrimitiveTypeConstant};

use crate::{ActiveNode, TrailingToken};

pub(crate) fn autocomplete_primitive_type(
    collection: &NodeIdMapCollection,
    active: &ActiveNode<'_>,
    maybe_trailing: Option<&TrailingToken>,
) -> Result<Vec<PrimitiveTypeConstant>, CommonError> {
    if !is_in_type_position(collection, active)? {
        return Ok(Vec::new());
    }
    let maybe_name = maybe_typed_prefix(active, maybe_trailing);
    Ok(PrimitiveTypeConstant::ALL
        .iter()
        .copied()
        .filter(|constant| match maybe_name.as_deref() {
            Some(name) => constant.as_str().starts_with(name),
            None => true,
        })
        .collect())
}

/// An unfilled type slot: an open `PrimitiveType` context, or an open
/// type-carrying construct whose type child has not completed.
fn is_in_type_position(
    collection: &NodeIdMapCollection,
    active: &ActiveNode<'_>,
) -> Result<bool, CommonError> {
    for node in &active.ancestry {
        match node.node_kind() {
            NodeKind::PrimitiveType if node.is_context() => return Ok(true),
            NodeKind::TypePrimaryType
            | NodeKind::NullablePrimitiveType
            | NodeKind::AsNullablePrimitiveType
                if node.is_context() =>
            {
                let mut has_completed_type = false;
                for &child in collection.child_ids(node.node_id()) {
                    let child_xor = collection.xor(child)?;
                    if child_xor.is_ast()
                        && matches!(
                            child_xor.node_kind(),
                            NodeKind::PrimitiveType | NodeKind::NullablePrimitiveType
                        )
                    {
                        has_completed_type = true;
                    }
                }
                if !has_completed_type {
                    return Ok(true);
                }
            }
            _ => {}
        }
    }
    Ok(false)
}

fn maybe_typed_prefix(
    active: &ActiveNode<'_>,
    maybe_trailing: Option<&TrailingToken>,
) -> Option<String> {
    if let Some(identifier) = &active.maybe_identifier_under_position {
        return Some(identifier.literal.clone());
    }
    let trailing = maybe_trailing?;
    if trailing.is_in_or_on_position {
        trailing.maybe_word().map(str::to_string)
    } else {
        None
    }
}
