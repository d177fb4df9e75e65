//! Binary-operator type inference over XorNodes.
//!
//! Works identically on finished and partially parsed operators: an
//! absent or still-open right operand degrades to the partial lookup, an
//! absent left operand to `Unknown`. Operand typing is best-effort
//! structural; anything requiring scope resolution stays `Unknown`.

use mq_diagnostic::{CancellationToken, CommonError, InvariantError};
use mq_ir::{
    AstNode, AstPayload, LiteralKind, NodeIdMapCollection, NodeKind, PrimitiveTypeConstant,
    XorNode,
};
use mq_types::{FieldMap, Type, TypeKind};

use crate::operator_table::{self, BinOp};

/// Read-only type inference over one node graph.
pub struct TypeInspector<'a> {
    collection: &'a NodeIdMapCollection,
    maybe_cancellation_token: Option<&'a dyn CancellationToken>,
}

impl<'a> TypeInspector<'a> {
    pub fn new(
        collection: &'a NodeIdMapCollection,
        maybe_cancellation_token: Option<&'a dyn CancellationToken>,
    ) -> Self {
        TypeInspector {
            collection,
            maybe_cancellation_token,
        }
    }

    #[inline]
    fn check_cancellation(&self) -> Result<(), CommonError> {
        match self.maybe_cancellation_token {
            Some(token) => token.check().map_err(CommonError::from),
            None => Ok(()),
        }
    }

    /// The type of a `TBinOpExpression` node.
    pub fn try_infer_bin_op_type(&self, node: XorNode<'_>) -> Result<Type, CommonError> {
        self.check_cancellation()?;
        if !node.node_kind().is_bin_op() {
            return Err(InvariantError::with_details(
                "expected a binary-operator node",
                node.node_kind().to_string(),
            )
            .into());
        }
        let children = self.collection.child_xors(node.node_id())?;
        let Some(&left) = children.first() else {
            return Ok(Type::UNKNOWN);
        };
        let maybe_op = children
            .get(1)
            .and_then(|child| child.maybe_ast())
            .and_then(operator_of);
        let Some(op) = maybe_op else {
            // Operator absent or still a context: the node is (so far)
            // just its left side.
            return self.infer_type(left);
        };

        // The operators outside the lookup tables.
        match node.node_kind() {
            NodeKind::IsExpression => return Ok(Type::primitive(TypeKind::Logical, false)),
            NodeKind::MetadataExpression => return self.infer_type(left),
            NodeKind::AsExpression => {
                return Ok(self.type_from_type_node(children.get(2).copied()));
            }
            _ => {}
        }

        let left_type = self.infer_type(left)?;
        let maybe_right = children.get(2).copied().filter(|right| right.is_ast());
        let Some(right) = maybe_right else {
            return Ok(partial_result(left_type.kind(), op));
        };
        let right_type = self.infer_type(right)?;
        let Some(result_kind) = operator_table::full_lookup(left_type.kind(), op, right_type.kind())
        else {
            return Ok(Type::NONE);
        };
        if op == BinOp::Ampersand
            && matches!(result_kind, TypeKind::Record | TypeKind::Table)
        {
            return combine_record_or_table(result_kind, left_type, right_type);
        }
        Ok(Type::primitive(
            result_kind,
            left_type.is_nullable() || right_type.is_nullable(),
        ))
    }

    /// Best-effort structural typing of any expression node.
    pub fn infer_type(&self, node: XorNode<'_>) -> Result<Type, CommonError> {
        self.check_cancellation()?;
        let Some(ast) = node.maybe_ast() else {
            return Ok(Type::UNKNOWN);
        };
        match ast.kind {
            NodeKind::LiteralExpression => Ok(literal_type(ast)),
            kind if kind.is_bin_op() => self.try_infer_bin_op_type(node),
            NodeKind::RecordExpression => self.infer_record(ast),
            NodeKind::ListExpression => Ok(Type::primitive(TypeKind::List, false)),
            NodeKind::ParenthesizedExpression => match self.collection.maybe_nth_child_xor(ast.id, 1)
            {
                Some(inner) => self.infer_type(inner),
                None => Ok(Type::UNKNOWN),
            },
            NodeKind::UnaryExpression => self.infer_unary(ast),
            NodeKind::FunctionExpression | NodeKind::EachExpression => {
                Ok(Type::primitive(TypeKind::Function, false))
            }
            NodeKind::TypePrimaryType => Ok(Type::primitive(TypeKind::Type, false)),
            _ => Ok(Type::UNKNOWN),
        }
    }

    fn infer_unary(&self, ast: &AstNode) -> Result<Type, CommonError> {
        let has_not = self
            .collection
            .maybe_nth_child_xor(ast.id, 0)
            .map(|operators| {
                self.collection
                    .child_ids(operators.node_id())
                    .iter()
                    .any(|&id| {
                        matches!(
                            self.collection.maybe_ast(id).map(|node| &node.payload),
                            Some(AstPayload::Constant(mq_ir::ConstantKind::Not))
                        )
                    })
            })
            .unwrap_or(false);
        if has_not {
            return Ok(Type::primitive(TypeKind::Logical, false));
        }
        match self.collection.maybe_nth_child_xor(ast.id, 1) {
            Some(operand) => self.infer_type(operand),
            None => Ok(Type::UNKNOWN),
        }
    }

    fn infer_record(&self, ast: &AstNode) -> Result<Type, CommonError> {
        let mut fields = FieldMap::default();
        if let Some(wrapper) = self.collection.maybe_nth_child_xor(ast.id, 1) {
            for &csv_id in self.collection.child_ids(wrapper.node_id()) {
                let Some(pair) = self.collection.maybe_nth_child_xor(csv_id, 0) else {
                    continue;
                };
                if pair.node_kind() != NodeKind::GeneralizedIdentifierPairedExpression {
                    continue;
                }
                let Some(key) = self
                    .collection
                    .maybe_nth_child_xor(pair.node_id(), 0)
                    .and_then(XorNode::maybe_ast)
                    .and_then(AstNode::maybe_leaf_text)
                else {
                    continue;
                };
                let value_type = match self.collection.maybe_nth_child_xor(pair.node_id(), 2) {
                    Some(value) => self.infer_type(value)?,
                    None => Type::UNKNOWN,
                };
                fields.insert(key.to_string(), value_type);
            }
        }
        Ok(Type::DefinedRecord {
            fields,
            is_open: false,
            is_nullable: false,
        })
    }

    /// The type asserted by a `NullablePrimitiveType` / `PrimitiveType`
    /// node, for `as` expressions.
    fn type_from_type_node(&self, maybe_node: Option<XorNode<'_>>) -> Type {
        let Some(ast) = maybe_node.and_then(|node| node.maybe_ast()) else {
            return Type::UNKNOWN;
        };
        match ast.kind {
            NodeKind::PrimitiveType => match &ast.payload {
                AstPayload::PrimitiveType(constant) => {
                    primitive_constant_type(*constant, *constant == PrimitiveTypeConstant::Null)
                }
                _ => Type::UNKNOWN,
            },
            NodeKind::NullablePrimitiveType => {
                match self
                    .collection
                    .maybe_nth_child_xor(ast.id, 1)
                    .and_then(|node| node.maybe_ast())
                    .map(|node| &node.payload)
                {
                    Some(AstPayload::PrimitiveType(constant)) => {
                        primitive_constant_type(*constant, true)
                    }
                    _ => Type::UNKNOWN,
                }
            }
            _ => Type::UNKNOWN,
        }
    }
}

fn operator_of(node: &AstNode) -> Option<BinOp> {
    match &node.payload {
        AstPayload::Constant(constant) => BinOp::from_constant(*constant),
        _ => None,
    }
}

fn literal_type(ast: &AstNode) -> Type {
    match &ast.payload {
        AstPayload::Literal { literal_kind, .. } => match literal_kind {
            LiteralKind::Numeric => Type::primitive(TypeKind::Number, false),
            LiteralKind::Text => Type::primitive(TypeKind::Text, false),
            LiteralKind::Logical => Type::primitive(TypeKind::Logical, false),
            LiteralKind::Null => Type::primitive(TypeKind::Null, true),
        },
        _ => Type::UNKNOWN,
    }
}

/// The partial lookup result: a singleton is a nullable primitive (the
/// right side is unknown), several kinds are a nullable union.
pub(crate) fn partial_result(left_kind: TypeKind, op: BinOp) -> Type {
    match operator_table::partial_lookup(left_kind, op) {
        None => Type::UNKNOWN,
        Some([kind]) => Type::primitive(*kind, true),
        Some(kinds) => Type::any_union(
            kinds
                .iter()
                .map(|&kind| Type::primitive(kind, true))
                .collect(),
        ),
    }
}

/// The `&` combine rules for records and tables.
fn combine_record_or_table(
    result_kind: TypeKind,
    left: Type,
    right: Type,
) -> Result<Type, CommonError> {
    match (left.is_extended(), right.is_extended()) {
        (false, false) => Ok(Type::primitive(
            result_kind,
            left.is_nullable() && right.is_nullable(),
        )),
        (true, false) => Ok(opened(left)),
        (false, true) => Ok(opened(right)),
        (true, true) => merge_extended(left, right),
    }
}

fn opened(value: Type) -> Type {
    match value {
        Type::DefinedRecord {
            fields,
            is_nullable,
            ..
        } => Type::DefinedRecord {
            fields,
            is_open: true,
            is_nullable,
        },
        Type::DefinedTable {
            fields,
            is_nullable,
            ..
        } => Type::DefinedTable {
            fields,
            is_open: true,
            is_nullable,
        },
        other => other,
    }
}

/// Right-biased field merge of two defined values of the same kind.
fn merge_extended(left: Type, right: Type) -> Result<Type, CommonError> {
    match (left, right) {
        (
            Type::DefinedRecord {
                fields: mut left_fields,
                is_open: left_open,
                is_nullable: left_nullable,
            },
            Type::DefinedRecord {
                fields: right_fields,
                is_open: right_open,
                is_nullable: right_nullable,
            },
        ) => {
            for (key, value) in right_fields {
                left_fields.insert(key, value);
            }
            Ok(Type::DefinedRecord {
                fields: left_fields,
                is_open: left_open || right_open,
                is_nullable: left_nullable && right_nullable,
            })
        }
        (
            Type::DefinedTable {
                fields: mut left_fields,
                is_open: left_open,
                is_nullable: left_nullable,
            },
            Type::DefinedTable {
                fields: right_fields,
                is_open: right_open,
                is_nullable: right_nullable,
            },
        ) => {
            for (key, value) in right_fields {
                left_fields.insert(key, value);
            }
            Ok(Type::DefinedTable {
                fields: left_fields,
                is_open: left_open || right_open,
                is_nullable: left_nullable && right_nullable,
            })
        }
        // The lookup admits `&` only between like kinds.
        _ => Err(InvariantError::new("record/table combine over mismatched kinds").into()),
    }
}

fn primitive_constant_type(constant: PrimitiveTypeConstant, is_nullable: bool) -> Type {
    let kind = match constant {
        PrimitiveTypeConstant::Action => TypeKind::Action,
        PrimitiveTypeConstant::Any => TypeKind::Any,
        PrimitiveTypeConstant::AnyNonNull => TypeKind::AnyNonNull,
        PrimitiveTypeConstant::Binary => TypeKind::Binary,
        PrimitiveTypeConstant::Date => TypeKind::Date,
        PrimitiveTypeConstant::DateTime => TypeKind::DateTime,
        PrimitiveTypeConstant::DateTimeZone => TypeKind::DateTimeZone,
        PrimitiveTypeConstant::Duration => TypeKind::Duration,
        PrimitiveTypeConstant::Function => TypeKind::Function,
        PrimitiveTypeConstant::List => TypeKind::List,
        PrimitiveTypeConstant::Logical => TypeKind::Logical,
        PrimitiveTypeConstant::None => TypeKind::None,
        PrimitiveTypeConstant::Null => TypeKind::Null,
        PrimitiveTypeConstant::Number => TypeKind::Number,
        PrimitiveTypeConstant::Record => TypeKind::Record,
        PrimitiveTypeConstant::Table => TypeKind::Table,
        PrimitiveTypeConstant::Text => TypeKind::Text,
        PrimitiveTypeConstant::Time => TypeKind::Time,
        PrimitiveTypeConstant::Type => TypeKind::Type,
    };
    Type::primitive(kind, is_nullable)
}
