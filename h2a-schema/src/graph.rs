//! Navigable graph of named types.
//!
//! Named types live in an arena and refer to each other through [`TypeId`].
//! Each type keeps a back-reference to its enclosing scope so callers can
//! tell whether it is nested inside an interface.

use crate::error::SchemaError;
use crate::fqname::QualifiedName;
use crate::types::{CompoundType, NamedType, NamedTypeKind, Type, TypeId};
use std::collections::HashMap;

/// Arena of named types keyed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    types: Vec<NamedType>,
    by_name: HashMap<QualifiedName, TypeId>,
}

impl TypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named type.
    ///
    /// # Errors
    /// Returns `SchemaError::Duplicate` if the name is already taken and
    /// `SchemaError::TypeNotFound` if `parent` is not in the graph.
    pub fn add(
        &mut self,
        fq_name: QualifiedName,
        kind: NamedTypeKind,
        parent: Option<TypeId>,
    ) -> Result<TypeId, SchemaError> {
        if self.by_name.contains_key(&fq_name) {
            return Err(SchemaError::Duplicate {
                name: fq_name.to_string(),
            });
        }
        if let Some(parent) = parent
            && parent.0 >= self.types.len()
        {
            return Err(SchemaError::TypeNotFound {
                name: format!("#{}", parent.0),
            });
        }

        let id = TypeId(self.types.len());
        self.by_name.insert(fq_name.clone(), id);
        self.types.push(NamedType {
            id,
            fq_name,
            parent,
            kind,
            doc: None,
        });
        Ok(id)
    }

    /// Returns the named type with the given id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this graph.
    #[must_use]
    pub fn get(&self, id: TypeId) -> &NamedType {
        &self.types[id.0]
    }

    /// Mutable access to a named type.
    ///
    /// # Panics
    /// Panics if the id does not belong to this graph.
    pub fn get_mut(&mut self, id: TypeId) -> &mut NamedType {
        &mut self.types[id.0]
    }

    /// Mutable access to an aggregate body.
    ///
    /// # Errors
    /// Returns `SchemaError::NotCompound` if the type is not a struct or union.
    pub fn compound_mut(&mut self, id: TypeId) -> Result<&mut CompoundType, SchemaError> {
        let named = &mut self.types[id.0];
        let name = named.fq_name.to_string();
        let kind = named.kind.keyword();
        named
            .as_compound_mut()
            .ok_or(SchemaError::NotCompound { name, kind })
    }

    /// Looks up a type by qualified name.
    #[must_use]
    pub fn find(&self, fq_name: &QualifiedName) -> Option<TypeId> {
        self.by_name.get(fq_name).copied()
    }

    /// Looks up a type by qualified name, failing if absent.
    ///
    /// # Errors
    /// Returns `SchemaError::TypeNotFound` if no such type exists.
    pub fn lookup(&self, fq_name: &QualifiedName) -> Result<TypeId, SchemaError> {
        self.find(fq_name).ok_or_else(|| SchemaError::TypeNotFound {
            name: fq_name.to_string(),
        })
    }

    /// Number of named types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the graph holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all named types in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedType> {
        self.types.iter()
    }

    /// Types declared directly inside `id`, in declaration order.
    pub fn children(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.types
            .iter()
            .filter(move |t| t.parent == Some(id))
            .map(|t| t.id)
    }

    /// Nearest enclosing interface of `id`, if any.
    #[must_use]
    pub fn enclosing_interface(&self, id: TypeId) -> Option<TypeId> {
        let mut parent = self.get(id).parent;
        while let Some(p) = parent {
            if self.get(p).is_interface() {
                return Some(p);
            }
            parent = self.get(p).parent;
        }
        None
    }

    /// Follows type aliases until a non-alias type is reached.
    ///
    /// # Errors
    /// Returns `SchemaError::CircularAlias` if an alias chain loops.
    pub fn resolve<'a>(&'a self, ty: &'a Type) -> Result<&'a Type, SchemaError> {
        let mut current = ty;
        let mut hops = 0;
        while let Type::Named(id) = current {
            match &self.get(*id).kind {
                NamedTypeKind::TypeAlias(target) => {
                    hops += 1;
                    if hops > self.types.len() {
                        return Err(SchemaError::CircularAlias {
                            name: self.get(*id).fq_name.to_string(),
                        });
                    }
                    current = target;
                }
                _ => break,
            }
        }
        Ok(current)
    }

    /// Renders a type for diagnostics.
    #[must_use]
    pub fn type_name(&self, ty: &Type) -> String {
        match ty {
            Type::Scalar(kind) => kind.idl_name().to_string(),
            Type::String => "string".to_string(),
            Type::Named(id) => self.get(*id).fq_name.to_string(),
            Type::Vector(inner) => format!("vec<{}>", self.type_name(inner)),
            Type::Array {
                element,
                dimensions,
            } => {
                let mut out = self.type_name(element);
                for dim in dimensions {
                    out.push_str(&format!("[{dim}]"));
                }
                out
            }
            Type::Handle => "handle".to_string(),
            Type::Memory => "memory".to_string(),
        }
    }

    /// Newest minor version present for a package major version.
    #[must_use]
    pub fn latest_minor(&self, package: &str, major: u32) -> Option<u32> {
        self.types
            .iter()
            .map(|t| &t.fq_name)
            .filter(|fq| fq.package() == package && fq.version().major == major)
            .map(|fq| fq.version().minor)
            .max()
    }

    /// All named types of `package@major.x` with `x <= max_minor`, keeping
    /// only the newest minor version of each same-named type.
    ///
    /// Order follows declaration order in the graph.
    #[must_use]
    pub fn translation_group(&self, package: &str, major: u32, max_minor: u32) -> Vec<TypeId> {
        let candidates: Vec<&NamedType> = self
            .types
            .iter()
            .filter(|t| {
                let v = t.fq_name.version();
                t.fq_name.package() == package && v.major == major && v.minor <= max_minor
            })
            .collect();

        let mut newest: HashMap<String, u32> = HashMap::new();
        for t in &candidates {
            let minor = t.fq_name.version().minor;
            newest
                .entry(t.fq_name.name())
                .and_modify(|m| *m = (*m).max(minor))
                .or_insert(minor);
        }

        candidates
            .into_iter()
            .filter(|t| newest.get(&t.fq_name.name()) == Some(&t.fq_name.version().minor))
            .map(|t| t.id)
            .collect()
    }
}
