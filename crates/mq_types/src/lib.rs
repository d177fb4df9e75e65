//! The type value model computed by the inspectors.
//!
//! `Type` is an immutable value: inference builds new values rather than
//! mutating, and `is_nullable` travels on every variant.

use std::fmt;

use indexmap::IndexMap;

/// The kind axis of a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum TypeKind {
    Action,
    Any,
    AnyNonNull,
    Binary,
    Date,
    DateTime,
    DateTimeZone,
    Duration,
    Function,
    List,
    Logical,
    None,
    Null,
    Number,
    Record,
    Table,
    Text,
    Time,
    Type,
    Unknown,
}

impl TypeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeKind::Action => "action",
            TypeKind::Any => "any",
            TypeKind::AnyNonNull => "anynonnull",
            TypeKind::Binary => "binary",
            TypeKind::Date => "date",
            TypeKind::DateTime => "datetime",
            TypeKind::DateTimeZone => "datetimezone",
            TypeKind::Duration => "duration",
            TypeKind::Function => "function",
            TypeKind::List => "list",
            TypeKind::Logical => "logical",
            TypeKind::None => "none",
            TypeKind::Null => "null",
            TypeKind::Number => "number",
            TypeKind::Record => "record",
            TypeKind::Table => "table",
            TypeKind::Text => "text",
            TypeKind::Time => "time",
            TypeKind::Type => "type",
            TypeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered field map of a defined record or table.
pub type FieldMap = IndexMap<String, Type>;

/// A computed type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Type {
    Primitive {
        kind: TypeKind,
        is_nullable: bool,
    },
    /// A union of admissible types, produced when inference cannot narrow
    /// to one kind.
    AnyUnion {
        union_of: Vec<Type>,
        is_nullable: bool,
    },
    /// A record whose fields are known. `is_open` admits extra fields.
    DefinedRecord {
        fields: FieldMap,
        is_open: bool,
        is_nullable: bool,
    },
    /// A table whose columns are known.
    DefinedTable {
        fields: FieldMap,
        is_open: bool,
        is_nullable: bool,
    },
    /// A function with a known signature.
    DefinedFunction {
        parameter_types: Vec<Type>,
        return_type: Box<Type>,
        is_nullable: bool,
    },
}

impl Type {
    /// A non-defined type of `kind`.
    pub const fn primitive(kind: TypeKind, is_nullable: bool) -> Type {
        Type::Primitive { kind, is_nullable }
    }

    /// The type inference falls back to when it has no information.
    pub const UNKNOWN: Type = Type::primitive(TypeKind::Unknown, false);

    /// The `none` type: the result of an operator combination with no
    /// defined outcome.
    pub const NONE: Type = Type::primitive(TypeKind::None, false);

    /// A union; nullable when any member is.
    pub fn any_union(union_of: Vec<Type>) -> Type {
        let is_nullable = union_of.iter().any(Type::is_nullable);
        Type::AnyUnion {
            union_of,
            is_nullable,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive { kind, .. } => *kind,
            Type::AnyUnion { .. } => TypeKind::Any,
            Type::DefinedRecord { .. } => TypeKind::Record,
            Type::DefinedTable { .. } => TypeKind::Table,
            Type::DefinedFunction { .. } => TypeKind::Function,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Primitive { is_nullable, .. }
            | Type::AnyUnion { is_nullable, .. }
            | Type::DefinedRecord { is_nullable, .. }
            | Type::DefinedTable { is_nullable, .. }
            | Type::DefinedFunction { is_nullable, .. } => *is_nullable,
        }
    }

    /// Whether this is a defined (extended) record or table.
    pub fn is_extended(&self) -> bool {
        matches!(
            self,
            Type::DefinedRecord { .. } | Type::DefinedTable { .. }
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nullable() {
            write!(f, "nullable ")?;
        }
        match self {
            Type::Primitive { kind, .. } => write!(f, "{kind}"),
            Type::AnyUnion { union_of, .. } => {
                f.write_str("any (")?;
                for (index, member) in union_of.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
            Type::DefinedRecord { fields, is_open, .. } => {
                write_fields(f, "record", fields, *is_open)
            }
            Type::DefinedTable { fields, is_open, .. } => {
                write_fields(f, "table", fields, *is_open)
            }
            Type::DefinedFunction {
                parameter_types,
                return_type,
                ..
            } => {
                f.write_str("function (")?;
                for (index, parameter) in parameter_types.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") as {return_type}")
            }
        }
    }
}

fn write_fields(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    fields: &FieldMap,
    is_open: bool,
) -> fmt::Result {
    write!(f, "{name} [")?;
    for (index, (field, field_type)) in fields.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{field} = {field_type}")?;
    }
    if is_open {
        if !fields.is_empty() {
            f.write_str(", ")?;
        }
        f.write_str("...")?;
    }
    f.write_str("]")
}
