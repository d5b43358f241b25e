//! Per-field translation statements.

use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use crate::flatten::{FlattenedField, ProcessedTypes};
use crate::replaced::ReplacedTypes;
use crate::translate::Backend;
use crate::translate::checks::emit_scalar_guard;
use crate::writer::CodeWriter;
use h2a_schema::{CompoundStyle, NamedType, ScalarKind, Type, TypeGraph, TypeId, capitalize};

/// Native type the new-IDL bindings use for a scalar.
const fn native_scalar(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::Int8 | ScalarKind::Uint8 => "int8_t",
        ScalarKind::Int16 | ScalarKind::Uint16 => "char16_t",
        ScalarKind::Int32 | ScalarKind::Uint32 => "int32_t",
        ScalarKind::Int64 | ScalarKind::Uint64 => "int64_t",
        ScalarKind::Float => "float",
        ScalarKind::Double => "double",
    }
}

/// Emits the translation statement of one flattened field.
pub struct FieldTranslator<'a> {
    graph: &'a TypeGraph,
    group: &'a [TypeId],
    processed: &'a ProcessedTypes,
    replaced: &'a ReplacedTypes,
    diagnostics: &'a Diagnostics,
    backend: Backend,
}

impl<'a> FieldTranslator<'a> {
    /// Creates a field translator for one backend.
    #[must_use]
    pub const fn new(
        graph: &'a TypeGraph,
        group: &'a [TypeId],
        processed: &'a ProcessedTypes,
        replaced: &'a ReplacedTypes,
        diagnostics: &'a Diagnostics,
        backend: Backend,
    ) -> Self {
        Self {
            graph,
            group,
            processed,
            replaced,
            diagnostics,
            backend,
        }
    }

    /// Emits the statement translating `field` of the aggregate `parent`.
    ///
    /// Fields that cannot be translated produce an `#error` line and a
    /// diagnostics note instead of failing.
    ///
    /// # Errors
    /// Returns `CodegenError` if `parent` is not an aggregate or the
    /// field's alias chain is circular.
    pub fn translate(
        &self,
        out: &mut CodeWriter,
        parent: TypeId,
        field: &FlattenedField,
    ) -> Result<(), CodegenError> {
        let parent = self.graph.get(parent);
        let style = parent.style().ok_or_else(|| {
            CodegenError::generation(format!("{} is not an aggregate", parent.fq_name()))
        })?;

        match self.graph.resolve(&field.field.ty)? {
            Type::Named(id) if self.graph.get(*id).is_enum() && self.in_group(*id) => {
                self.simple(out, parent, style, field, SimpleKind::Enum(*id));
            }
            Type::Named(id) => self.named(out, parent, style, field, *id),
            Type::Scalar(kind) => self.simple(out, parent, style, field, SimpleKind::Scalar(*kind)),
            Type::String => self.simple(out, parent, style, field, SimpleKind::String),
            other => {
                let type_name = self.graph.type_name(other);
                self.diagnostics.note(format!(
                    "An unhandled type was found in translation: {type_name}"
                ));
                out.line(format!("#error FIXME Unhandled type: {type_name}"));
            }
        }
        Ok(())
    }

    fn in_group(&self, id: TypeId) -> bool {
        self.group.contains(&id)
    }

    /// Named types outside the group go through the replaced table or are
    /// reported as unknown. Enums outside the group land here too.
    fn named(
        &self,
        out: &mut CodeWriter,
        parent: &NamedType,
        style: CompoundStyle,
        field: &FlattenedField,
        id: TypeId,
    ) {
        let target = self.graph.get(id);
        if !self.processed.contains_key(&id) {
            match self
                .replaced
                .get(target.fq_name())
                .and_then(|info| info.translate_field)
            {
                Some(snippet) => snippet(out),
                None => {
                    let fq_name = target.fq_name();
                    self.diagnostics.note(format!(
                        "An unknown named type was found in translation: {fq_name}"
                    ));
                    out.line(format!("#error FIXME Unknown type: {fq_name}"));
                }
            }
            return;
        }

        let name = field.name();
        let path = &field.access_path;
        match (style, self.backend) {
            (CompoundStyle::Struct, Backend::Java) => {
                out.line(format!("out.{name} = h2aTranslate(in.{path});"));
            }
            (CompoundStyle::Struct, _) => {
                out.line(format!(
                    "if (!translate(in.{path}, &out->{name})) return false;"
                ));
            }
            (_, Backend::Java) => {
                out.line(format!(
                    "out.set{}(h2aTranslate(in.{path}()));",
                    capitalize(name)
                ));
            }
            (_, backend) => {
                let field_type = backend.aidl_type_path(target.fq_name());
                let parent_type = backend.aidl_type_path(parent.fq_name());
                out.block("", |out| {
                    out.line(format!("{field_type} {name};"));
                    out.line(format!("if (!translate(in.{path}(), &{name})) return false;"));
                    out.line(format!("out->set<{parent_type}::{name}>({name});"));
                });
            }
        }
    }

    fn simple(
        &self,
        out: &mut CodeWriter,
        parent: &NamedType,
        style: CompoundStyle,
        field: &FlattenedField,
        kind: SimpleKind,
    ) {
        let name = field.name();
        let call = if style == CompoundStyle::Struct { "" } else { "()" };
        let value = format!("in.{}{call}", field.access_path);

        if let SimpleKind::Scalar(scalar) = kind {
            emit_scalar_guard(out, scalar, &value, &field.access_path, self.backend);
        }

        if self.backend == Backend::Java {
            if style == CompoundStyle::Struct {
                out.line(format!("out.{name} = {value};"));
            } else {
                out.line(format!("out.set{}({value});", capitalize(name)));
            }
            return;
        }

        let value = match kind {
            SimpleKind::String => self.backend.wrap_string(&value),
            SimpleKind::Scalar(scalar) => {
                format!("static_cast<{}>({value})", native_scalar(scalar))
            }
            SimpleKind::Enum(id) => format!(
                "static_cast<{}>({value})",
                self.backend.aidl_type_path(self.graph.get(id).fq_name())
            ),
        };
        if style == CompoundStyle::Struct {
            out.line(format!("out->{name} = {value};"));
        } else {
            let parent_type = self.backend.aidl_type_path(parent.fq_name());
            out.line(format!("out->set<{parent_type}::{name}>({value});"));
        }
    }
}

/// Value category copied without a nested translator call.
#[derive(Debug, Clone, Copy)]
enum SimpleKind {
    Scalar(ScalarKind),
    String,
    Enum(TypeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::process_group;
    use h2a_schema::{
        CompoundType, EnumType, EnumValue, Field, NamedTypeKind, QualifiedName,
    };

    fn fq(s: &str) -> QualifiedName {
        QualifiedName::parse(s).expect("valid name")
    }

    struct Fixture {
        graph: TypeGraph,
        group: Vec<TypeId>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                graph: TypeGraph::new(),
                group: Vec::new(),
            }
        }

        fn aggregate(&mut self, name: &str, style: CompoundStyle, fields: Vec<Field>) -> TypeId {
            let mut compound = CompoundType::new(style);
            compound.fields = fields;
            let id = self
                .graph
                .add(fq(name), NamedTypeKind::Compound(compound), None)
                .expect("add");
            self.group.push(id);
            id
        }

        /// Emits every field of `parent` for `backend`.
        fn emit(&self, parent: TypeId, backend: Backend) -> (String, Vec<String>) {
            let diagnostics = Diagnostics::new();
            let processed = process_group(&self.graph, &self.group, &diagnostics).expect("process");
            let replaced = ReplacedTypes::default();
            let translator = FieldTranslator::new(
                &self.graph,
                &self.group,
                &processed,
                &replaced,
                &diagnostics,
                backend,
            );
            let mut out = CodeWriter::new();
            for field in &processed[&parent].fields {
                translator.translate(&mut out, parent, field).expect("translate");
            }
            (out.finish(), diagnostics.entries())
        }
    }

    #[test]
    fn test_struct_scalar_and_string_copies() {
        let mut fixture = Fixture::new();
        let s = fixture.aggregate(
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![
                Field::new("a", Type::Scalar(ScalarKind::Int32)),
                Field::new("b", Type::String),
            ],
        );

        let (ndk, notes) = fixture.emit(s, Backend::Ndk);
        assert_eq!(ndk, "out->a = static_cast<int32_t>(in.a);\nout->b = in.b;\n");
        assert!(notes.is_empty());

        let (cpp, _) = fixture.emit(s, Backend::Cpp);
        assert_eq!(
            cpp,
            "out->a = static_cast<int32_t>(in.a);\nout->b = String16(in.b.c_str());\n"
        );

        let (java, _) = fixture.emit(s, Backend::Java);
        assert_eq!(java, "out.a = in.a;\nout.b = in.b;\n");
    }

    #[test]
    fn test_nested_struct_call() {
        let mut fixture = Fixture::new();
        let inner = fixture.aggregate("a.b@1.0::Inner", CompoundStyle::Struct, vec![]);
        let outer = fixture.aggregate(
            "a.b@1.0::Outer",
            CompoundStyle::Struct,
            vec![Field::new("inner", Type::Named(inner))],
        );

        let (ndk, _) = fixture.emit(outer, Backend::Ndk);
        assert_eq!(ndk, "if (!translate(in.inner, &out->inner)) return false;\n");
        let (java, _) = fixture.emit(outer, Backend::Java);
        assert_eq!(java, "out.inner = h2aTranslate(in.inner);\n");
    }

    #[test]
    fn test_union_nested_call_and_setters() {
        let mut fixture = Fixture::new();
        let inner = fixture.aggregate("a.b@1.0::Inner", CompoundStyle::Struct, vec![]);
        let u = fixture.aggregate(
            "a.b@1.0::U",
            CompoundStyle::SafeUnion,
            vec![
                Field::new("inner", Type::Named(inner)),
                Field::new("c", Type::Scalar(ScalarKind::Int8)),
            ],
        );

        let (ndk, _) = fixture.emit(u, Backend::Ndk);
        assert_eq!(
            ndk,
            "{\n\
             \x20   aidl::a::b::Inner inner;\n\
             \x20   if (!translate(in.inner(), &inner)) return false;\n\
             \x20   out->set<aidl::a::b::U::inner>(inner);\n\
             }\n\
             out->set<aidl::a::b::U::c>(static_cast<int8_t>(in.c()));\n"
        );

        let (java, _) = fixture.emit(u, Backend::Java);
        assert_eq!(
            java,
            "out.setInner(h2aTranslate(in.inner()));\nout.setC(in.c());\n"
        );
    }

    #[test]
    fn test_guarded_uint32_in_inherited_field() {
        let mut fixture = Fixture::new();
        let old = fixture.aggregate(
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![Field::new("a", Type::Scalar(ScalarKind::Uint32))],
        );
        let new = fixture.aggregate(
            "a.b@1.1::S",
            CompoundStyle::Struct,
            vec![Field::new("v1_0", Type::Named(old))],
        );

        let (ndk, _) = fixture.emit(new, Backend::Ndk);
        assert!(ndk.contains("if (in.v1_0.a > 2147483647 || in.v1_0.a < 0) {\n    return false;\n}\n"));
        assert!(ndk.ends_with("out->a = static_cast<int32_t>(in.v1_0.a);\n"));

        let (java, _) = fixture.emit(new, Backend::Java);
        assert!(java.contains("scalars for field: v1_0.a\");"));
        assert!(java.ends_with("out.a = in.v1_0.a;\n"));
    }

    #[test]
    fn test_enum_field_cast_without_guard() {
        let mut fixture = Fixture::new();
        let color = fixture
            .graph
            .add(
                fq("a.b@2.0::Color"),
                NamedTypeKind::Enum(EnumType {
                    storage: ScalarKind::Uint32,
                    values: vec![EnumValue {
                        name: "RED".into(),
                        value: "0".into(),
                    }],
                }),
                None,
            )
            .expect("add");
        fixture.group.push(color);
        let s = fixture.aggregate(
            "a.b@2.0::S",
            CompoundStyle::Struct,
            vec![Field::new("color", Type::Named(color))],
        );

        let (ndk, notes) = fixture.emit(s, Backend::Ndk);
        assert_eq!(
            ndk,
            "out->color = static_cast<aidl::a::b2::Color>(in.color);\n"
        );
        assert!(notes.is_empty());
        let (cpp, _) = fixture.emit(s, Backend::Cpp);
        assert_eq!(cpp, "out->color = static_cast<a::b2::Color>(in.color);\n");
    }

    #[test]
    fn test_enum_outside_group_is_unknown() {
        let mut fixture = Fixture::new();
        let color = fixture
            .graph
            .add(
                fq("c.d@1.0::Color"),
                NamedTypeKind::Enum(EnumType {
                    storage: ScalarKind::Uint8,
                    values: vec![EnumValue {
                        name: "RED".into(),
                        value: "0".into(),
                    }],
                }),
                None,
            )
            .expect("add");
        let s = fixture.aggregate(
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![Field::new("color", Type::Named(color))],
        );

        for backend in Backend::ALL {
            let (out, notes) = fixture.emit(s, backend);
            assert_eq!(out, "#error FIXME Unknown type: c.d@1.0::Color\n");
            assert_eq!(
                notes,
                vec!["An unknown named type was found in translation: c.d@1.0::Color"]
            );
        }
    }

    #[test]
    fn test_unknown_and_unhandled_types() {
        let mut fixture = Fixture::new();
        let foreign = fixture
            .graph
            .add(
                fq("c.d@1.0::Foreign"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                None,
            )
            .expect("add");
        let s = fixture.aggregate(
            "a.b@1.0::S",
            CompoundStyle::Struct,
            vec![
                Field::new("f", Type::Named(foreign)),
                Field::new("v", Type::Vector(Box::new(Type::Scalar(ScalarKind::Int32)))),
            ],
        );

        let (ndk, notes) = fixture.emit(s, Backend::Ndk);
        assert_eq!(
            ndk,
            "#error FIXME Unknown type: c.d@1.0::Foreign\n\
             #error FIXME Unhandled type: vec<int32_t>\n"
        );
        assert_eq!(
            notes,
            vec![
                "An unknown named type was found in translation: c.d@1.0::Foreign",
                "An unhandled type was found in translation: vec<int32_t>",
            ]
        );
    }

    #[test]
    fn test_replaced_type_snippet() {
        let mut fixture = Fixture::new();
        let monostate = fixture
            .graph
            .add(
                fq("android.hidl.safe_union@1.0::Monostate"),
                NamedTypeKind::Compound(CompoundType::new(CompoundStyle::Struct)),
                None,
            )
            .expect("add");
        let u = fixture.aggregate(
            "a.b@1.0::U",
            CompoundStyle::SafeUnion,
            vec![Field::new("noinit", Type::Named(monostate))],
        );

        let (java, notes) = fixture.emit(u, Backend::Java);
        assert_eq!(java, "// Nothing to translate for Monostate.\n");
        assert!(notes.is_empty());
    }
}
