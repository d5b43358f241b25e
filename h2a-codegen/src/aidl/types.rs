//! Old-IDL field type to new-IDL type syntax.

use crate::error::CodegenError;
use crate::naming::{aidl_fq_name, aidl_name, aidl_package};
use crate::replaced::ReplacedTypes;
use h2a_schema::{NamedTypeKind, QualifiedName, ScalarKind, Type, TypeGraph, TypeId};

/// New-IDL token for a scalar. The new IDL has no unsigned integers.
#[must_use]
pub const fn scalar_aidl_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "boolean",
        ScalarKind::Int8 | ScalarKind::Uint8 => "byte",
        ScalarKind::Int16 | ScalarKind::Uint16 => "char",
        ScalarKind::Int32 | ScalarKind::Uint32 => "int",
        ScalarKind::Int64 | ScalarKind::Uint64 => "long",
        ScalarKind::Float => "float",
        ScalarKind::Double => "double",
    }
}

/// Maps field types against one type graph.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    graph: &'a TypeGraph,
    replaced: &'a ReplacedTypes,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper.
    #[must_use]
    pub const fn new(graph: &'a TypeGraph, replaced: &'a ReplacedTypes) -> Self {
        Self { graph, replaced }
    }

    /// Maps `ty` to new-IDL syntax as seen from a type named `relative_to`.
    ///
    /// Named types in the same new-IDL package use their short name,
    /// others are fully qualified. Type aliases are followed.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` for vectors, arrays, handles,
    /// memory and interface references.
    pub fn map(&self, ty: &Type, relative_to: &QualifiedName) -> Result<String, CodegenError> {
        match self.graph.resolve(ty)? {
            Type::Scalar(kind) => Ok(scalar_aidl_type(*kind).to_string()),
            Type::String => Ok("String".to_string()),
            Type::Named(id) => self.map_named(*id, relative_to),
            other => Err(CodegenError::unsupported(
                self.graph.type_name(other),
                relative_to.to_string(),
            )),
        }
    }

    /// Maps a named type reference.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` for interfaces and aliases.
    pub fn map_named(&self, id: TypeId, relative_to: &QualifiedName) -> Result<String, CodegenError> {
        let named = self.graph.get(id);
        let fq_name = named.fq_name();
        if let Some(info) = self.replaced.get(fq_name) {
            return Ok(info.aidl_type.clone());
        }
        match named.kind {
            NamedTypeKind::Compound(_) | NamedTypeKind::Enum(_) => {
                if aidl_package(fq_name) == aidl_package(relative_to) {
                    Ok(aidl_name(fq_name))
                } else {
                    Ok(aidl_fq_name(fq_name))
                }
            }
            NamedTypeKind::TypeAlias(_) | NamedTypeKind::Interface => Err(
                CodegenError::unsupported(fq_name.to_string(), relative_to.to_string()),
            ),
        }
    }

    /// Returns the named type `ty` resolves to if it needs an `import`
    /// from a type named `relative_to`.
    ///
    /// # Errors
    /// Propagates alias resolution errors.
    pub fn import_for(
        &self,
        ty: &Type,
        relative_to: &QualifiedName,
    ) -> Result<Option<String>, CodegenError> {
        let Some(id) = self.graph.resolve(ty)?.as_named() else {
            return Ok(None);
        };
        let named = self.graph.get(id);
        let fq_name = named.fq_name();
        let importable = (named.is_compound() || named.is_enum())
            && self.replaced.get(fq_name).is_none()
            && aidl_package(fq_name) != aidl_package(relative_to);
        Ok(importable.then(|| aidl_fq_name(fq_name)))
    }
}
