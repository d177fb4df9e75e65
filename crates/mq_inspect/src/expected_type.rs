//! Expected-type inspection: what type the grammar wants at the caret.

use mq_diagnostic::CommonError;
use mq_ir::{NodeIdMapCollection, NodeKind};
use mq_types::{Type, TypeKind};

use crate::type_inference::{partial_result, TypeInspector};
use crate::ActiveNode;

/// Walk the ancestry from the active leaf and report the first slot with
/// a known expected type; absent when the grammar puts no constraint on
/// the caret's position.
pub fn try_expected_type(
    collection: &NodeIdMapCollection,
    active: &ActiveNode<'_>,
) -> Result<Option<Type>, CommonError> {
    let ancestry = &active.ancestry;

    // The leaf itself may be the unfilled slot.
    if let Some(context) = ancestry[0].maybe_context() {
        if context.kind == NodeKind::IfExpression && context.attribute_counter == 1 {
            return Ok(Some(Type::primitive(TypeKind::Logical, false)));
        }
    }

    let inspector = TypeInspector::new(collection, None);
    for index in 1..ancestry.len() {
        let parent = ancestry[index];
        let child = ancestry[index - 1];
        match parent.node_kind() {
            // An if-expression wants `logical` between `if` and `then`.
            NodeKind::IfExpression => {
                if matches!(child.maybe_attribute_index(), Some(0) | Some(1)) {
                    return Ok(Some(Type::primitive(TypeKind::Logical, false)));
                }
            }
            // An unfilled right operand wants whatever the partial lookup
            // admits for the left side and the operator.
            kind if kind.is_bin_op() => {
                if child.maybe_attribute_index() == Some(2) {
                    let maybe_left = collection.maybe_nth_child_xor(parent.node_id(), 0);
                    let maybe_op = collection
                        .maybe_nth_child_xor(parent.node_id(), 1)
                        .and_then(|op| op.maybe_ast())
                        .and_then(|op| match &op.payload {
                            mq_ir::AstPayload::Constant(constant) => {
                                crate::BinOp::from_constant(*constant)
                            }
                            _ => None,
                        });
                    if let (Some(left), Some(op)) = (maybe_left, maybe_op) {
                        let left_type = inspector.infer_type(left)?;
                        let expected = partial_result(left_type.kind(), op);
                        if expected != Type::UNKNOWN {
                            return Ok(Some(expected));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
