//! New-IDL declaration files.

use crate::aidl::types::TypeMapper;
use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use crate::flatten::ProcessedTypes;
use crate::naming::{aidl_name, aidl_package, aidl_package_path};
use crate::output::GeneratedFile;
use crate::replaced::ReplacedTypes;
use crate::writer::CodeWriter;
use h2a_schema::{
    CompoundStyle, CompoundType, EnumType, NamedType, NamedTypeKind, ScalarKind, TypeGraph, TypeId,
};
use std::collections::BTreeSet;

/// Default header comment of every generated file.
pub const DEFAULT_LICENSE_HEADER: &str = "// FIXME: license file if you have one";

/// Generator for `.aidl` declaration files.
pub struct DeclarationGenerator<'a> {
    graph: &'a TypeGraph,
    processed: &'a ProcessedTypes,
    replaced: &'a ReplacedTypes,
    diagnostics: &'a Diagnostics,
    license_header: &'a str,
}

impl<'a> DeclarationGenerator<'a> {
    /// Creates a new declaration generator.
    #[must_use]
    pub fn new(
        graph: &'a TypeGraph,
        processed: &'a ProcessedTypes,
        replaced: &'a ReplacedTypes,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            graph,
            processed,
            replaced,
            diagnostics,
            license_header: DEFAULT_LICENSE_HEADER,
        }
    }

    /// Sets the header comment written at the top of each file.
    #[must_use]
    pub fn license_header(mut self, header: &'a str) -> Self {
        self.license_header = header;
        self
    }

    /// Generates one file per declarable type of `group`.
    ///
    /// # Errors
    /// Returns `CodegenError` if an aggregate was not processed or a type
    /// reference cannot be resolved.
    pub fn generate(&self, group: &[TypeId]) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        for &id in group {
            if let Some(file) = self.generate_type(id)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    /// Generates the declaration of one type, if it has a new-IDL form.
    ///
    /// # Errors
    /// See [`DeclarationGenerator::generate`].
    pub fn generate_type(&self, id: TypeId) -> Result<Option<GeneratedFile>, CodegenError> {
        let named = self.graph.get(id);
        let fq_name = named.fq_name();

        if self.replaced.get(fq_name).is_some() {
            tracing::debug!("{} is replaced, no declaration emitted", fq_name);
            return Ok(None);
        }

        let body = match &named.kind {
            NamedTypeKind::Compound(compound) => self.emit_compound(id, named, compound)?,
            NamedTypeKind::Enum(enum_type) => self.emit_enum(named, enum_type),
            NamedTypeKind::TypeAlias(target) => {
                self.diagnostics.note(format!(
                    "Cannot convert typedef {} {} since AIDL does not support typedefs.",
                    self.graph.type_name(target),
                    fq_name
                ));
                return Ok(None);
            }
            NamedTypeKind::Interface => {
                self.diagnostics.note(format!(
                    "Interface {fq_name} was not converted. Only its nested types are declared."
                ));
                return Ok(None);
            }
        };

        let path = format!("{}/{}.aidl", aidl_package_path(fq_name), aidl_name(fq_name));
        Ok(Some(GeneratedFile::new(path, body)))
    }

    fn emit_compound(
        &self,
        id: TypeId,
        named: &NamedType,
        compound: &CompoundType,
    ) -> Result<String, CodegenError> {
        let fq_name = named.fq_name();
        let processed = self.processed.get(&id).ok_or_else(|| {
            CodegenError::generation(format!("aggregate {fq_name} was not processed"))
        })?;
        let mapper = TypeMapper::new(self.graph, self.replaced);

        let mut imports = BTreeSet::new();
        let mut body = CodeWriter::new();
        for field in &processed.fields {
            if let Some(doc) = &field.field.doc {
                body.doc_comment(doc);
            }
            match mapper.map(&field.field.ty, fq_name) {
                Ok(aidl_type) => {
                    body.line(format!("{aidl_type} {};", field.name()));
                    if let Some(import) = mapper.import_for(&field.field.ty, fq_name)? {
                        imports.insert(import);
                    }
                }
                Err(err @ CodegenError::UnsupportedType { .. }) => {
                    self.diagnostics.note(format!(
                        "Unable to convert field {} of {}: {}",
                        field.name(),
                        fq_name,
                        err
                    ));
                    body.line(format!("// FIXME: {err}"));
                }
                Err(err) => return Err(err),
            }
        }

        let keyword = match compound.style {
            CompoundStyle::Struct => "parcelable",
            CompoundStyle::Union | CompoundStyle::SafeUnion => "union",
        };

        let mut out = self.file_header(named, &imports);
        if let Some(doc) = &named.doc {
            out.doc_comment(doc);
        }
        out.block(format!("{keyword} {}", aidl_name(fq_name)), |out| {
            out.lines(body.as_str());
        });
        Ok(out.finish())
    }

    fn emit_enum(&self, named: &NamedType, enum_type: &EnumType) -> String {
        let mut out = self.file_header(named, &BTreeSet::new());
        if let Some(doc) = &named.doc {
            out.doc_comment(doc);
        }
        out.line(format!(
            "@Backing(type=\"{}\")",
            backing_type(enum_type.storage)
        ));
        out.block(format!("enum {}", aidl_name(named.fq_name())), |out| {
            for value in &enum_type.values {
                if value.value.is_empty() {
                    out.line(format!("{},", value.name));
                } else {
                    out.line(format!("{} = {},", value.name, value.value));
                }
            }
        });
        out.finish()
    }

    fn file_header(&self, named: &NamedType, imports: &BTreeSet<String>) -> CodeWriter {
        let mut out = CodeWriter::new();
        out.lines(self.license_header);
        out.blank();
        out.line(format!("package {};", aidl_package(named.fq_name())));
        out.blank();
        if !imports.is_empty() {
            for import in imports {
                out.line(format!("import {import};"));
            }
            out.blank();
        }
        out
    }
}

/// Enum backing type. Only `byte`, `int` and `long` are valid backings.
const fn backing_type(storage: ScalarKind) -> &'static str {
    match storage {
        ScalarKind::Int8 | ScalarKind::Uint8 => "byte",
        ScalarKind::Int64 | ScalarKind::Uint64 => "long",
        _ => "int",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::process_group;
    use h2a_schema::{EnumValue, Field, QualifiedName, Type};

    fn fq(s: &str) -> QualifiedName {
        QualifiedName::parse(s).expect("valid name")
    }

    fn generate(graph: &TypeGraph, group: &[TypeId], diagnostics: &Diagnostics) -> Vec<GeneratedFile> {
        let processed = process_group(graph, group, diagnostics).expect("process");
        let replaced = ReplacedTypes::default();
        DeclarationGenerator::new(graph, &processed, &replaced, diagnostics)
            .generate(group)
            .expect("generate")
    }

    #[test]
    fn test_parcelable_with_docs_and_imports() {
        let mut graph = TypeGraph::new();
        let remote = graph
            .add(
                fq("c.d@2.0::Remote"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                None,
            )
            .expect("add");
        let mut compound = CompoundType::new(CompoundStyle::Struct);
        compound.add_field(Field::new("a", Type::Scalar(ScalarKind::Int32)).with_doc("An int."));
        compound.add_field(Field::new("r", Type::Named(remote)));
        let id = graph
            .add(fq("a.b@1.0::Foo"), NamedTypeKind::Compound(compound), None)
            .expect("add");
        graph.get_mut(id).doc = Some("Foo doc.".to_string());

        let diagnostics = Diagnostics::new();
        let files = generate(&graph, &[id], &diagnostics);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.to_str(), Some("a/b/Foo.aidl"));
        assert_eq!(
            files[0].contents,
            "// FIXME: license file if you have one\n\
             \n\
             package a.b;\n\
             \n\
             import c.d2.Remote;\n\
             \n\
             /**\n * Foo doc.\n */\n\
             parcelable Foo {\n\
             \x20   /**\n\
             \x20    * An int.\n\
             \x20    */\n\
             \x20   int a;\n\
             \x20   c.d2.Remote r;\n\
             }\n"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_safe_union_and_enum() {
        let mut graph = TypeGraph::new();
        let color = graph
            .add(
                fq("a.b@2.0::Color"),
                NamedTypeKind::Enum(EnumType {
                    storage: ScalarKind::Uint8,
                    values: vec![
                        EnumValue {
                            name: "RED".into(),
                            value: "0".into(),
                        },
                        EnumValue {
                            name: "GREEN".into(),
                            value: String::new(),
                        },
                    ],
                }),
                None,
            )
            .expect("add");
        let mut compound = CompoundType::new(CompoundStyle::SafeUnion);
        compound.add_field(Field::new("color", Type::Named(color)));
        compound.add_field(Field::new("text", Type::String));
        let union = graph
            .add(fq("a.b@2.0::Choice"), NamedTypeKind::Compound(compound), None)
            .expect("add");

        let files = generate(&graph, &[color, union], &Diagnostics::new());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path.to_str(), Some("a/b2/Color.aidl"));
        assert!(files[0].contents.contains("package a.b2;\n"));
        assert!(files[0].contents.contains(
            "@Backing(type=\"byte\")\nenum Color {\n    RED = 0,\n    GREEN,\n}\n"
        ));
        assert!(
            files[1]
                .contents
                .contains("union Choice {\n    Color color;\n    String text;\n}\n")
        );
    }

    #[test]
    fn test_unsupported_field_becomes_fixme() {
        let mut graph = TypeGraph::new();
        let mut compound = CompoundType::new(CompoundStyle::Struct);
        compound.add_field(Field::new(
            "values",
            Type::Vector(Box::new(Type::Scalar(ScalarKind::Int32))),
        ));
        let id = graph
            .add(fq("a.b@1.0::S"), NamedTypeKind::Compound(compound), None)
            .expect("add");

        let diagnostics = Diagnostics::new();
        let files = generate(&graph, &[id], &diagnostics);
        assert!(files[0].contents.contains("    // FIXME: unsupported type 'vec<int32_t>'"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].starts_with("Unable to convert field values of a.b@1.0::S"));
    }

    #[test]
    fn test_typedef_and_interface_only_noted() {
        let mut graph = TypeGraph::new();
        let alias = graph
            .add(
                fq("a.b@1.0::Id"),
                NamedTypeKind::TypeAlias(Type::Scalar(ScalarKind::Uint32)),
                None,
            )
            .expect("add");
        let iface = graph
            .add(fq("a.b@1.0::IFoo"), NamedTypeKind::Interface, None)
            .expect("add");

        let diagnostics = Diagnostics::new();
        let files = generate(&graph, &[alias, iface], &diagnostics);
        assert!(files.is_empty());
        let entries = diagnostics.entries();
        assert_eq!(
            entries[0],
            "Cannot convert typedef uint32_t a.b@1.0::Id since AIDL does not support typedefs."
        );
        assert!(entries[1].contains("a.b@1.0::IFoo"));
    }

    #[test]
    fn test_replaced_type_not_declared() {
        let mut graph = TypeGraph::new();
        let id = graph
            .add(
                fq("android.hidl.safe_union@1.0::Monostate"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                None,
            )
            .expect("add");
        let files = generate(&graph, &[id], &Diagnostics::new());
        assert!(files.is_empty());
    }

    #[test]
    fn test_custom_license_header() {
        let mut graph = TypeGraph::new();
        let id = graph
            .add(
                fq("a.b@1.0::Empty"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                None,
            )
            .expect("add");
        let diagnostics = Diagnostics::new();
        let processed = process_group(&graph, &[id], &diagnostics).expect("process");
        let replaced = ReplacedTypes::empty();
        let files = DeclarationGenerator::new(&graph, &processed, &replaced, &diagnostics)
            .license_header("// Copyright 2026\n// All rights reserved.")
            .generate(&[id])
            .expect("generate");
        assert!(
            files[0]
                .contents
                .starts_with("// Copyright 2026\n// All rights reserved.\n\npackage a.b;\n")
        );
    }
}
