//! The static binary-operator tables.
//!
//! Built once at first use by composing the per-kind rule families; the
//! partial index is derived from the full table by dropping the right
//! operand and collecting the admissible result kinds.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use mq_ir::ConstantKind;
use mq_types::TypeKind;

/// A binary operator, as read from its `Constant` node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqualTo,
    GreaterThan,
    GreaterThanEqualTo,
    Plus,
    Minus,
    Multiply,
    Divide,
    Ampersand,
    And,
    Or,
    As,
    Is,
    Meta,
}

impl BinOp {
    pub fn from_constant(constant: ConstantKind) -> Option<BinOp> {
        match constant {
            ConstantKind::Equal => Some(BinOp::Equal),
            ConstantKind::NotEqual => Some(BinOp::NotEqual),
            ConstantKind::LessThan => Some(BinOp::LessThan),
            ConstantKind::LessThanEqualTo => Some(BinOp::LessThanEqualTo),
            ConstantKind::GreaterThan => Some(BinOp::GreaterThan),
            ConstantKind::GreaterThanEqualTo => Some(BinOp::GreaterThanEqualTo),
            ConstantKind::Plus => Some(BinOp::Plus),
            ConstantKind::Minus => Some(BinOp::Minus),
            ConstantKind::Asterisk => Some(BinOp::Multiply),
            ConstantKind::Division => Some(BinOp::Divide),
            ConstantKind::Ampersand => Some(BinOp::Ampersand),
            ConstantKind::And => Some(BinOp::And),
            ConstantKind::Or => Some(BinOp::Or),
            ConstantKind::As => Some(BinOp::As),
            ConstantKind::Is => Some(BinOp::Is),
            ConstantKind::Meta => Some(BinOp::Meta),
            _ => None,
        }
    }
}

type FullKey = (TypeKind, BinOp, TypeKind);

/// `(left, op, right) -> result`.
static FULL_LOOKUP: Lazy<FxHashMap<FullKey, TypeKind>> = Lazy::new(build_full_lookup);

/// `(left, op) -> sorted admissible result kinds`.
static PARTIAL_LOOKUP: Lazy<FxHashMap<(TypeKind, BinOp), Vec<TypeKind>>> = Lazy::new(|| {
    let mut partial: FxHashMap<(TypeKind, BinOp), Vec<TypeKind>> = FxHashMap::default();
    for (&(left, op, _right), &result) in FULL_LOOKUP.iter() {
        partial.entry((left, op)).or_default().push(result);
    }
    for results in partial.values_mut() {
        results.sort_unstable();
        results.dedup();
    }
    partial
});

pub(crate) fn full_lookup(left: TypeKind, op: BinOp, right: TypeKind) -> Option<TypeKind> {
    FULL_LOOKUP.get(&(left, op, right)).copied()
}

pub(crate) fn partial_lookup(left: TypeKind, op: BinOp) -> Option<&'static [TypeKind]> {
    PARTIAL_LOOKUP.get(&(left, op)).map(Vec::as_slice)
}

fn build_full_lookup() -> FxHashMap<FullKey, TypeKind> {
    const ORDERED: [TypeKind; 7] = [
        TypeKind::Date,
        TypeKind::DateTime,
        TypeKind::DateTimeZone,
        TypeKind::Duration,
        TypeKind::Number,
        TypeKind::Text,
        TypeKind::Time,
    ];
    // Equality is total: every kind compares to itself, unlike the
    // ordered-comparable subset above.
    const EQUATABLE: [TypeKind; 19] = [
        TypeKind::Action,
        TypeKind::Any,
        TypeKind::AnyNonNull,
        TypeKind::Binary,
        TypeKind::Date,
        TypeKind::DateTime,
        TypeKind::DateTimeZone,
        TypeKind::Duration,
        TypeKind::Function,
        TypeKind::List,
        TypeKind::Logical,
        TypeKind::None,
        TypeKind::Null,
        TypeKind::Number,
        TypeKind::Record,
        TypeKind::Table,
        TypeKind::Text,
        TypeKind::Time,
        TypeKind::Type,
    ];
    const CLOCK: [TypeKind; 4] = [
        TypeKind::Time,
        TypeKind::Date,
        TypeKind::DateTime,
        TypeKind::DateTimeZone,
    ];

    let mut table: FxHashMap<FullKey, TypeKind> = FxHashMap::default();

    for kind in ORDERED {
        for op in [
            BinOp::GreaterThan,
            BinOp::GreaterThanEqualTo,
            BinOp::LessThan,
            BinOp::LessThanEqualTo,
        ] {
            table.insert((kind, op, kind), TypeKind::Logical);
        }
    }
    for kind in EQUATABLE {
        for op in [BinOp::Equal, BinOp::NotEqual] {
            table.insert((kind, op, kind), TypeKind::Logical);
        }
    }
    for op in [BinOp::Plus, BinOp::Minus, BinOp::Multiply, BinOp::Divide] {
        table.insert((TypeKind::Number, op, TypeKind::Number), TypeKind::Number);
    }
    for op in [BinOp::And, BinOp::Or] {
        table.insert((TypeKind::Logical, op, TypeKind::Logical), TypeKind::Logical);
    }
    for kind in CLOCK {
        table.insert((kind, BinOp::Plus, TypeKind::Duration), kind);
        table.insert((TypeKind::Duration, BinOp::Plus, kind), kind);
        table.insert((kind, BinOp::Minus, TypeKind::Duration), kind);
        table.insert((kind, BinOp::Minus, kind), TypeKind::Duration);
    }
    table.insert(
        (TypeKind::Date, BinOp::Ampersand, TypeKind::Time),
        TypeKind::DateTime,
    );
    table.insert(
        (TypeKind::Duration, BinOp::Plus, TypeKind::Duration),
        TypeKind::Duration,
    );
    table.insert(
        (TypeKind::Duration, BinOp::Minus, TypeKind::Duration),
        TypeKind::Duration,
    );
    table.insert(
        (TypeKind::Duration, BinOp::Multiply, TypeKind::Number),
        TypeKind::Duration,
    );
    table.insert(
        (TypeKind::Number, BinOp::Multiply, TypeKind::Duration),
        TypeKind::Duration,
    );
    table.insert(
        (TypeKind::Duration, BinOp::Divide, TypeKind::Number),
        TypeKind::Duration,
    );
    for kind in [TypeKind::Text, TypeKind::List, TypeKind::Record, TypeKind::Table] {
        table.insert((kind, BinOp::Ampersand, kind), kind);
    }
    table
}
