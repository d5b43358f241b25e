//! Type definitions of the old-IDL type graph.
//!
//! This module contains the data structures representing named types
//! (structs, unions, enums, typedefs, interfaces), their fields, and the
//! field types that reference them.

use crate::fqname::QualifiedName;
use std::fmt;

/// Index of a named type inside a [`TypeGraph`](crate::graph::TypeGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Scalar kinds of the old IDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
}

impl ScalarKind {
    /// Parses a scalar from its IDL name.
    #[must_use]
    pub fn from_idl_name(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(Self::Bool),
            "int8" | "int8_t" => Some(Self::Int8),
            "uint8" | "uint8_t" => Some(Self::Uint8),
            "int16" | "int16_t" => Some(Self::Int16),
            "uint16" | "uint16_t" => Some(Self::Uint16),
            "int32" | "int32_t" => Some(Self::Int32),
            "uint32" | "uint32_t" => Some(Self::Uint32),
            "int64" | "int64_t" => Some(Self::Int64),
            "uint64" | "uint64_t" => Some(Self::Uint64),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns the IDL name of the scalar.
    #[must_use]
    pub const fn idl_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8_t",
            Self::Uint8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::Uint16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::Uint32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::Uint64 => "uint64_t",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Returns true for unsigned integer kinds.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.idl_name())
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Scalar value.
    Scalar(ScalarKind),
    /// String.
    String,
    /// Reference to a named type in the graph.
    Named(TypeId),
    /// Variable-length vector.
    Vector(Box<Type>),
    /// Fixed-size (possibly multi-dimensional) array.
    Array {
        /// Element type.
        element: Box<Type>,
        /// Dimensions, outermost first.
        dimensions: Vec<usize>,
    },
    /// Native handle.
    Handle,
    /// Shared memory block.
    Memory,
}

impl Type {
    /// Returns true if this is a scalar.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the named type this refers to, if any.
    #[must_use]
    pub const fn as_named(&self) -> Option<TypeId> {
        match self {
            Self::Named(id) => Some(*id),
            _ => None,
        }
    }
}

/// Field of an aggregate type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Documentation text.
    pub doc: Option<String>,
}

impl Field {
    /// Creates a new undocumented field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: None,
        }
    }

    /// Attaches documentation text.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Aggregate layout style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundStyle {
    /// Plain struct: every field present.
    Struct,
    /// Plain union without a runtime tag.
    Union,
    /// Discriminated union carrying its active member tag.
    SafeUnion,
}

impl CompoundStyle {
    /// Keyword used in diagnostics.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::SafeUnion => "safe_union",
        }
    }
}

/// Struct, union, or safe union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundType {
    /// Layout style.
    pub style: CompoundStyle,
    /// Declared fields in order.
    pub fields: Vec<Field>,
}

impl CompoundType {
    /// Creates an aggregate with no fields.
    #[must_use]
    pub const fn new(style: CompoundStyle) -> Self {
        Self {
            style,
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }
}

/// Enumerator of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Enumerator name.
    pub name: String,
    /// Value expression as written.
    pub value: String,
}

/// Enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Underlying storage scalar.
    pub storage: ScalarKind,
    /// Enumerators in order.
    pub values: Vec<EnumValue>,
}

/// Variants of named types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedTypeKind {
    /// Struct or union.
    Compound(CompoundType),
    /// Enum.
    Enum(EnumType),
    /// Typedef of another type.
    TypeAlias(Type),
    /// Interface scope. Only its nested types are modelled.
    Interface,
}

impl NamedTypeKind {
    /// Keyword used in diagnostics.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Compound(c) => c.style.keyword(),
            Self::Enum(_) => "enum",
            Self::TypeAlias(_) => "typedef",
            Self::Interface => "interface",
        }
    }
}

/// Named type in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    pub(crate) id: TypeId,
    pub(crate) fq_name: QualifiedName,
    pub(crate) parent: Option<TypeId>,
    /// Type variant.
    pub kind: NamedTypeKind,
    /// Documentation text.
    pub doc: Option<String>,
}

impl NamedType {
    /// Graph id of this type.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Qualified name.
    #[must_use]
    pub const fn fq_name(&self) -> &QualifiedName {
        &self.fq_name
    }

    /// Enclosing named scope, `None` at package level.
    #[must_use]
    pub const fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    /// Returns the aggregate body, if this is a struct or union.
    #[must_use]
    pub const fn as_compound(&self) -> Option<&CompoundType> {
        match &self.kind {
            NamedTypeKind::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable aggregate body.
    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundType> {
        match &mut self.kind {
            NamedTypeKind::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the enum body, if this is an enum.
    #[must_use]
    pub const fn as_enum(&self) -> Option<&EnumType> {
        match &self.kind {
            NamedTypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if this is a struct or union.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self.kind, NamedTypeKind::Compound(_))
    }

    /// Returns true if this is an enum.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, NamedTypeKind::Enum(_))
    }

    /// Returns true if this is an interface.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, NamedTypeKind::Interface)
    }

    /// Returns the aggregate style, if this is a struct or union.
    #[must_use]
    pub fn style(&self) -> Option<CompoundStyle> {
        self.as_compound().map(|c| c.style)
    }
}
