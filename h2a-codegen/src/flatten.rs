//! Field flattening across version inheritance.
//!
//! A newer version of an aggregate usually embeds the previous version as a
//! field (`struct Foo@1.1 { Foo@1.0 v1_0; int32 extra; }`). The new IDL has
//! one unversioned type, so the embedded fields are hoisted into the outer
//! type and addressed by an access path through the embedding field
//! (`v1_0.a` for structs, `v1_0().a` for unions).

use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use h2a_schema::{CompoundStyle, Field, SchemaError, Type, TypeGraph, TypeId, Version};
use std::collections::{BTreeMap, BTreeSet};

/// Field reached through zero or more levels of version inheritance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedField {
    /// The declared field.
    pub field: Field,
    /// Path from the outermost translated value to this field.
    pub access_path: String,
    /// (version that declared the field, version being translated).
    pub version_span: (Version, Version),
}

impl FlattenedField {
    /// Field name as it appears in the new IDL.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Version whose declaration introduced the field.
    #[must_use]
    pub const fn introduced(&self) -> Version {
        self.version_span.0
    }
}

/// Flattened view of one aggregate, shared by every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedCompoundType {
    /// Fields in declaration order, inherited first.
    pub fields: Vec<FlattenedField>,
    /// Named types the aggregate declares or references.
    pub sub_types: BTreeSet<TypeId>,
}

/// Processed aggregates of one translation group.
pub type ProcessedTypes = BTreeMap<TypeId, ProcessedCompoundType>;

/// Flattens one aggregate.
///
/// # Errors
/// Returns `CodegenError::Schema` if `id` is not a struct or union or a
/// field's alias chain is circular.
pub fn process_compound_type(
    graph: &TypeGraph,
    id: TypeId,
    diagnostics: &Diagnostics,
) -> Result<ProcessedCompoundType, CodegenError> {
    let mut processed = ProcessedCompoundType::default();
    let current = graph.get(id).fq_name().version();
    visit(graph, id, "", current, &mut processed, diagnostics)?;
    tracing::debug!(
        "flattened {} into {} fields",
        graph.get(id).fq_name(),
        processed.fields.len()
    );
    Ok(processed)
}

/// Flattens every aggregate in `group`. Other named types are skipped.
///
/// # Errors
/// Propagates errors from [`process_compound_type`].
pub fn process_group(
    graph: &TypeGraph,
    group: &[TypeId],
    diagnostics: &Diagnostics,
) -> Result<ProcessedTypes, CodegenError> {
    let mut processed = ProcessedTypes::new();
    for &id in group {
        if graph.get(id).is_compound() {
            processed.insert(id, process_compound_type(graph, id, diagnostics)?);
        }
    }
    Ok(processed)
}

fn visit(
    graph: &TypeGraph,
    id: TypeId,
    prefix: &str,
    current: Version,
    processed: &mut ProcessedCompoundType,
    diagnostics: &Diagnostics,
) -> Result<(), CodegenError> {
    let named = graph.get(id);
    let compound = named.as_compound().ok_or_else(|| SchemaError::NotCompound {
        name: named.fq_name().to_string(),
        kind: named.kind.keyword(),
    })?;
    let version = named.fq_name().version();
    let separator = match compound.style {
        CompoundStyle::Struct => ".",
        CompoundStyle::Union | CompoundStyle::SafeUnion => "().",
    };

    processed.sub_types.extend(
        graph
            .children(id)
            .filter(|child| graph.get(*child).is_compound() || graph.get(*child).is_enum()),
    );

    for field in &compound.fields {
        let resolved = graph.resolve(&field.ty)?;

        if let Some(older) = older_version_of(graph, id, resolved) {
            let nested_prefix = format!("{prefix}{}{separator}", field.name);
            visit(graph, older, &nested_prefix, current, processed, diagnostics)?;
            continue;
        }

        if let Type::Named(target) = resolved {
            let target_type = graph.get(*target);
            if target_type.is_compound() || target_type.is_enum() {
                processed.sub_types.insert(*target);
            }
        }

        let entry = FlattenedField {
            field: field.clone(),
            access_path: format!("{prefix}{}", field.name),
            version_span: (version, current),
        };

        match processed
            .fields
            .iter()
            .position(|existing| existing.name() == field.name)
        {
            Some(index) => {
                let kept = processed.fields[index].introduced();
                let mut note = format!(
                    "Found conflicting field name \"{}\" in different versions of {}. ",
                    field.name,
                    named.fq_name().name()
                );
                if version > kept {
                    note.push_str(&format!("Keeping {version} and discarding {kept}."));
                    processed.fields.remove(index);
                    processed.fields.push(entry);
                } else {
                    note.push_str(&format!("Keeping {kept} and discarding {version}."));
                }
                diagnostics.note(note);
            }
            None => processed.fields.push(entry),
        }
    }

    Ok(())
}

/// Returns the target if `ty` is an older version of the aggregate `id`.
fn older_version_of(graph: &TypeGraph, id: TypeId, ty: &Type) -> Option<TypeId> {
    let target = ty.as_named()?;
    let this = graph.get(id).fq_name();
    let other = graph.get(target);
    let other_name = other.fq_name();
    (other.is_compound()
        && other_name.package() == this.package()
        && other_name.names() == this.names()
        && other_name.version() < this.version())
    .then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2a_schema::{CompoundType, NamedTypeKind, QualifiedName, ScalarKind};

    fn fq(s: &str) -> QualifiedName {
        QualifiedName::parse(s).expect("valid name")
    }

    fn add_compound(
        graph: &mut TypeGraph,
        name: &str,
        style: CompoundStyle,
        fields: Vec<Field>,
    ) -> TypeId {
        let mut compound = CompoundType::new(style);
        compound.fields = fields;
        graph
            .add(fq(name), NamedTypeKind::Compound(compound), None)
            .expect("add")
    }

    fn int32(name: &str) -> Field {
        Field::new(name, Type::Scalar(ScalarKind::Int32))
    }

    #[test]
    fn test_flat_struct_has_one_entry_per_field() {
        let mut graph = TypeGraph::new();
        let id = add_compound(
            &mut graph,
            "a.b@1.3::Plain",
            CompoundStyle::Struct,
            vec![int32("x"), Field::new("y", Type::String), int32("z")],
        );
        let diagnostics = Diagnostics::new();
        let processed = process_compound_type(&graph, id, &diagnostics).expect("process");

        let v = Version::new(1, 3);
        assert_eq!(processed.fields.len(), 3);
        for (field, name) in processed.fields.iter().zip(["x", "y", "z"]) {
            assert_eq!(field.access_path, name);
            assert_eq!(field.version_span, (v, v));
        }
        assert!(processed.sub_types.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_inherited_fields_come_first_with_paths() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::Outer",
            CompoundStyle::Struct,
            vec![int32("inner")],
        );
        let new = add_compound(
            &mut graph,
            "a.b@1.1::Outer",
            CompoundStyle::Struct,
            vec![Field::new("v1_0", Type::Named(old)), int32("a")],
        );
        let processed =
            process_compound_type(&graph, new, &Diagnostics::new()).expect("process");

        let paths: Vec<&str> = processed
            .fields
            .iter()
            .map(|f| f.access_path.as_str())
            .collect();
        assert_eq!(paths, vec!["v1_0.inner", "a"]);
        assert_eq!(
            processed.fields[0].version_span,
            (Version::new(1, 0), Version::new(1, 1))
        );
        assert_eq!(processed.fields[0].name(), "inner");
        assert!(!processed.sub_types.contains(&old));
    }

    #[test]
    fn test_multi_level_inheritance() {
        let mut graph = TypeGraph::new();
        let v10 = add_compound(
            &mut graph,
            "a.b@1.0::NameCollision",
            CompoundStyle::Struct,
            vec![int32("a")],
        );
        let v11 = add_compound(
            &mut graph,
            "a.b@1.1::NameCollision",
            CompoundStyle::Struct,
            vec![
                Field::new("reference", Type::Named(v10)),
                Field::new("b", Type::String),
            ],
        );
        let v12 = add_compound(
            &mut graph,
            "a.b@1.2::NameCollision",
            CompoundStyle::Struct,
            vec![
                Field::new("reference", Type::Named(v11)),
                Field::new("c", Type::String),
            ],
        );
        let processed =
            process_compound_type(&graph, v12, &Diagnostics::new()).expect("process");
        let paths: Vec<&str> = processed
            .fields
            .iter()
            .map(|f| f.access_path.as_str())
            .collect();
        assert_eq!(paths, vec!["reference.reference.a", "reference.b", "c"]);
    }

    #[test]
    fn test_union_paths_use_accessor_calls() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::U",
            CompoundStyle::SafeUnion,
            vec![int32("a")],
        );
        let new = add_compound(
            &mut graph,
            "a.b@1.1::U",
            CompoundStyle::SafeUnion,
            vec![Field::new("v1_0", Type::Named(old)), int32("b")],
        );
        let processed =
            process_compound_type(&graph, new, &Diagnostics::new()).expect("process");
        assert_eq!(processed.fields[0].access_path, "v1_0().a");
    }

    #[test]
    fn test_conflicting_field_keeps_newer_version() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![int32("x"), int32("y")],
        );
        let new = add_compound(
            &mut graph,
            "a.b@1.1::S",
            CompoundStyle::Struct,
            vec![Field::new("v1_0", Type::Named(old)), Field::new("x", Type::String)],
        );
        let diagnostics = Diagnostics::new();
        let processed = process_compound_type(&graph, new, &diagnostics).expect("process");

        let paths: Vec<&str> = processed
            .fields
            .iter()
            .map(|f| f.access_path.as_str())
            .collect();
        assert_eq!(paths, vec!["v1_0.y", "x"]);
        assert_eq!(processed.fields[1].field.ty, Type::String);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].contains("Keeping 1.1 and discarding 1.0"));
    }

    #[test]
    fn test_conflicting_field_declared_before_older_version() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![int32("x"), int32("y")],
        );
        let new = add_compound(
            &mut graph,
            "a.b@1.1::S",
            CompoundStyle::Struct,
            vec![Field::new("x", Type::String), Field::new("v1_0", Type::Named(old))],
        );
        let diagnostics = Diagnostics::new();
        let processed = process_compound_type(&graph, new, &diagnostics).expect("process");

        let paths: Vec<&str> = processed
            .fields
            .iter()
            .map(|f| f.access_path.as_str())
            .collect();
        assert_eq!(paths, vec!["x", "v1_0.y"]);
        assert_eq!(processed.fields[0].field.ty, Type::String);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].contains("Keeping 1.1 and discarding 1.0"));
    }

    #[test]
    fn test_conflicting_field_across_major_versions() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![Field::new("x", Type::String)],
        );
        let new = add_compound(
            &mut graph,
            "a.b@2.0::S",
            CompoundStyle::Struct,
            vec![int32("x"), Field::new("v1_0", Type::Named(old))],
        );
        let diagnostics = Diagnostics::new();
        let processed = process_compound_type(&graph, new, &diagnostics).expect("process");

        assert_eq!(processed.fields.len(), 1);
        assert_eq!(processed.fields[0].access_path, "x");
        assert_eq!(processed.fields[0].introduced(), Version::new(2, 0));
        assert!(diagnostics.entries()[0].contains("Keeping 2.0 and discarding 1.0"));

        // Same conflict with the older version embedded first.
        let newer_last = add_compound(
            &mut graph,
            "a.b@3.0::S",
            CompoundStyle::Struct,
            vec![Field::new("v1_0", Type::Named(old)), int32("x")],
        );
        let diagnostics = Diagnostics::new();
        let processed = process_compound_type(&graph, newer_last, &diagnostics).expect("process");
        assert_eq!(processed.fields.len(), 1);
        assert_eq!(processed.fields[0].access_path, "x");
        assert!(diagnostics.entries()[0].contains("Keeping 3.0 and discarding 1.0"));
    }

    #[test]
    fn test_sub_types_collect_nested_and_referenced() {
        let mut graph = TypeGraph::new();
        let outer = add_compound(&mut graph, "a.b@1.0::Outer", CompoundStyle::Struct, vec![]);
        let inner = graph
            .add(
                fq("a.b@1.0::Outer.Inner"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                Some(outer),
            )
            .expect("add");
        let other = add_compound(&mut graph, "a.b@1.0::Other", CompoundStyle::Struct, vec![]);
        graph
            .compound_mut(outer)
            .expect("compound")
            .fields
            .extend([
                Field::new("inner", Type::Named(inner)),
                Field::new("other", Type::Named(other)),
                Field::new("again", Type::Named(other)),
            ]);

        let processed =
            process_compound_type(&graph, outer, &Diagnostics::new()).expect("process");
        assert_eq!(
            processed.sub_types.iter().copied().collect::<Vec<_>>(),
            vec![inner, other]
        );
    }

    #[test]
    fn test_flattening_is_idempotent() {
        let mut graph = TypeGraph::new();
        let old = add_compound(
            &mut graph,
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![int32("x")],
        );
        let new = add_compound(
            &mut graph,
            "a.b@1.1::S",
            CompoundStyle::Struct,
            vec![Field::new("v1_0", Type::Named(old)), int32("y")],
        );
        let diagnostics = Diagnostics::new();
        let first = process_compound_type(&graph, new, &diagnostics).expect("process");
        let second = process_compound_type(&graph, new, &diagnostics).expect("process");
        assert_eq!(first, second);
    }

    #[test]
    fn test_process_group_skips_non_aggregates() {
        let mut graph = TypeGraph::new();
        let s = add_compound(&mut graph, "a.b@1.0::S", CompoundStyle::Struct, vec![]);
        let alias = graph
            .add(
                fq("a.b@1.0::T"),
                NamedTypeKind::TypeAlias(Type::String),
                None,
            )
            .expect("add");
        let processed =
            process_group(&graph, &[s, alias], &Diagnostics::new()).expect("process");
        assert_eq!(processed.len(), 1);
        assert!(processed.contains_key(&s));
    }

    #[test]
    fn test_non_aggregate_rejected() {
        let mut graph = TypeGraph::new();
        let alias = graph
            .add(
                fq("a.b@1.0::T"),
                NamedTypeKind::TypeAlias(Type::String),
                None,
            )
            .expect("add");
        assert!(process_compound_type(&graph, alias, &Diagnostics::new()).is_err());
    }
}
