//! Translator headers and sources.

use crate::aidl::declarations::DEFAULT_LICENSE_HEADER;
use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use crate::flatten::{ProcessedCompoundType, ProcessedTypes};
use crate::naming::{aidl_package, hidl_package_path};
use crate::output::GeneratedFile;
use crate::replaced::ReplacedTypes;
use crate::translate::{Backend, FieldTranslator};
use crate::writer::CodeWriter;
use h2a_schema::{CompoundStyle, NamedType, QualifiedName, TypeGraph, TypeId};
use std::collections::BTreeSet;

/// Namespace holding the native translators.
const NAMESPACE: &str = "android::h2a";

/// Generator for translator files of one translation group.
pub struct TranslateGenerator<'a> {
    graph: &'a TypeGraph,
    group: &'a [TypeId],
    processed: &'a ProcessedTypes,
    replaced: &'a ReplacedTypes,
    diagnostics: &'a Diagnostics,
    license_header: &'a str,
}

impl<'a> TranslateGenerator<'a> {
    /// Creates a new translator generator.
    #[must_use]
    pub fn new(
        graph: &'a TypeGraph,
        group: &'a [TypeId],
        processed: &'a ProcessedTypes,
        replaced: &'a ReplacedTypes,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            graph,
            group,
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

    /// Generates the header (native only) and source for each backend.
    ///
    /// Nothing is generated when the group has no aggregates.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field type cannot be resolved.
    pub fn generate(
        &self,
        target: &QualifiedName,
        backends: &[Backend],
    ) -> Result<Vec<GeneratedFile>, CodegenError> {
        let mut files = Vec::new();
        if self.processed.is_empty() {
            return Ok(files);
        }
        for &backend in backends {
            if let Some(header) = self.header(target, backend) {
                files.push(header);
            }
            files.push(self.source(target, backend)?);
        }
        Ok(files)
    }

    /// Aggregates of the group in declaration order.
    fn aggregates(&self) -> impl Iterator<Item = (TypeId, &'a NamedType, &'a ProcessedCompoundType)> {
        let graph = self.graph;
        let processed = self.processed;
        let group = self.group;
        group
            .iter()
            .filter_map(move |&id| processed.get(&id).map(|p| (id, graph.get(id), p)))
    }

    /// Native header declaring one translator per aggregate.
    ///
    /// Plain unions have no translator and are not declared.
    #[must_use]
    pub fn header(&self, target: &QualifiedName, backend: Backend) -> Option<GeneratedFile> {
        let header_file = backend.header_file(target)?;

        let translatable: Vec<_> = self
            .aggregates()
            .filter(|(_, named, _)| named.style() != Some(CompoundStyle::Union))
            .collect();

        let mut includes = BTreeSet::new();
        for (id, named, processed) in &translatable {
            includes.insert(backend.aidl_include(named.fq_name()));
            includes.insert(self.hidl_include(*id));
            for &sub_type in &processed.sub_types {
                let fq_name = self.graph.get(sub_type).fq_name();
                if self.replaced.get(fq_name).is_none() {
                    includes.insert(backend.aidl_include(fq_name));
                }
                includes.insert(self.hidl_include(sub_type));
            }
        }

        let mut out = CodeWriter::new();
        out.lines(self.license_header);
        out.blank();
        out.line("#pragma once");
        out.blank();
        for include in &includes {
            out.line(include);
        }
        out.blank();
        out.line(format!("namespace {NAMESPACE} {{"));
        out.blank();
        for (_, named, _) in &translatable {
            out.line(format!("{};", backend.signature(named)));
        }
        out.blank();
        out.line(format!("}}  // namespace {NAMESPACE}"));

        tracing::debug!("{} header declares {} translators", backend, translatable.len());
        Some(GeneratedFile::new(
            format!("include/{header_file}"),
            out.finish(),
        ))
    }

    /// Source defining one translator per aggregate.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field type cannot be resolved.
    pub fn source(
        &self,
        target: &QualifiedName,
        backend: Backend,
    ) -> Result<GeneratedFile, CodegenError> {
        let translator = FieldTranslator::new(
            self.graph,
            self.group,
            self.processed,
            self.replaced,
            self.diagnostics,
            backend,
        );

        let mut out = CodeWriter::new();
        out.lines(self.license_header);
        out.blank();

        let mut body = CodeWriter::new();
        for (id, named, processed) in self.aggregates() {
            self.emit_function(&mut body, &translator, backend, id, named, processed)?;
        }

        match backend.header_file(target) {
            Some(header_file) => {
                out.line(format!("#include \"{header_file}\""));
                out.blank();
                out.line(format!("namespace {NAMESPACE} {{"));
                out.blank();
                out.lines(body.as_str());
                out.line(format!("}}  // namespace {NAMESPACE}"));
            }
            None => {
                out.line(format!("package {};", aidl_package(target)));
                out.blank();
                out.block("public class Translate", |out| {
                    out.lines(body.as_str());
                });
            }
        }

        Ok(GeneratedFile::new(backend.source_file(target), out.finish()))
    }

    fn emit_function(
        &self,
        out: &mut CodeWriter,
        translator: &FieldTranslator<'_>,
        backend: Backend,
        id: TypeId,
        named: &NamedType,
        processed: &ProcessedCompoundType,
    ) -> Result<(), CodegenError> {
        let signature = backend.signature(named);
        let style = named.style().ok_or_else(|| {
            CodegenError::generation(format!("{} is not an aggregate", named.fq_name()))
        })?;

        if style == CompoundStyle::Union {
            out.line(
                "// FIXME not enough information to safely convert. Remove this function or \
                 fill it out using the custom discriminators.",
            );
            out.line(format!("// {signature}"));
            out.blank();
            return Ok(());
        }

        let aidl_type = backend.aidl_type_path(named.fq_name());
        let mut result = Ok(());
        out.block(&signature, |out| {
            if backend == Backend::Java {
                out.line(format!("{aidl_type} out = new {aidl_type}();"));
            }
            result = if style == CompoundStyle::SafeUnion {
                Self::emit_switch(out, translator, backend, id, named, processed)
            } else {
                processed
                    .fields
                    .iter()
                    .try_for_each(|field| translator.translate(out, id, field))
            };
            out.line(if backend == Backend::Java {
                "return out;"
            } else {
                "return true;"
            });
        });
        out.blank();
        result
    }

    fn emit_switch(
        out: &mut CodeWriter,
        translator: &FieldTranslator<'_>,
        backend: Backend,
        id: TypeId,
        named: &NamedType,
        processed: &ProcessedCompoundType,
    ) -> Result<(), CodegenError> {
        let discriminator = match backend {
            Backend::Java => format!("{}.hidl_discriminator", named.fq_name().java_name()),
            Backend::Ndk | Backend::Cpp => {
                format!("{}::hidl_discriminator", named.fq_name().cpp_name())
            }
        };
        let separator = if backend == Backend::Java { "." } else { "::" };

        let mut result = Ok(());
        out.block("switch (in.getDiscriminator())", |out| {
            for field in &processed.fields {
                out.line(format!("case {discriminator}{separator}{}:", field.name()));
                out.indent(|out| {
                    if result.is_ok() {
                        result = translator.translate(out, id, field);
                    }
                    out.line("break;");
                });
            }
            out.line("default:");
            out.indent(|out| {
                if backend == Backend::Java {
                    out.line(
                        "throw new RuntimeException(\"Unknown discriminator value: \" + \
                         Integer.toString(in.getDiscriminator()));",
                    );
                } else {
                    out.line("return false;");
                }
            });
        });
        result
    }

    /// Include of the old-IDL binding header declaring `id`.
    fn hidl_include(&self, id: TypeId) -> String {
        let fq_name = self.graph.get(id).fq_name();
        let file = match self.graph.enclosing_interface(id) {
            Some(interface) => {
                let interface = self.graph.get(interface).fq_name();
                interface.names().first().cloned().unwrap_or_default()
            }
            None => "types".to_string(),
        };
        format!(
            "#include \"{}/{}/{}.h\"",
            hidl_package_path(fq_name),
            fq_name.version_string(),
            file
        )
    }
}
