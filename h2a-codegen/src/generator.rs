//! Generation of every artifact for one package version.

use crate::aidl::{DEFAULT_LICENSE_HEADER, DeclarationGenerator};
use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use crate::flatten::process_group;
use crate::naming::aidl_package;
use crate::output::GeneratedFile;
use crate::replaced::ReplacedTypes;
use crate::translate::{Backend, TranslateGenerator};
use h2a_schema::{QualifiedName, TypeGraph};

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    backends: Vec<Backend>,
    emit_declarations: bool,
    replaced: ReplacedTypes,
    license_header: String,
}

impl GeneratorConfig {
    /// Creates the default configuration: every backend, declarations on,
    /// default replaced types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Backend::ALL.to_vec(),
            emit_declarations: true,
            replaced: ReplacedTypes::default(),
            license_header: DEFAULT_LICENSE_HEADER.to_string(),
        }
    }

    /// Sets the translator backends.
    #[must_use]
    pub fn backends(mut self, backends: impl IntoIterator<Item = Backend>) -> Self {
        self.backends = backends.into_iter().collect();
        self.backends.sort();
        self.backends.dedup();
        self
    }

    /// Enables or disables `.aidl` declaration files.
    #[must_use]
    pub fn emit_declarations(mut self, enabled: bool) -> Self {
        self.emit_declarations = enabled;
        self
    }

    /// Sets the replaced types table.
    #[must_use]
    pub fn replaced_types(mut self, replaced: ReplacedTypes) -> Self {
        self.replaced = replaced;
        self
    }

    /// Sets the header comment of every generated file.
    #[must_use]
    pub fn license_header(mut self, header: impl Into<String>) -> Self {
        self.license_header = header.into();
        self
    }

    /// Enabled backends.
    #[must_use]
    pub fn enabled_backends(&self) -> &[Backend] {
        &self.backends
    }

    /// Replaced types table.
    #[must_use]
    pub fn replaced(&self) -> &ReplacedTypes {
        &self.replaced
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Main code generator.
pub struct Generator<'a> {
    graph: &'a TypeGraph,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with the default configuration.
    #[must_use]
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self::with_config(graph, GeneratorConfig::default())
    }

    /// Creates a new generator with the given configuration.
    #[must_use]
    pub fn with_config(graph: &'a TypeGraph, config: GeneratorConfig) -> Self {
        Self { graph, config }
    }

    /// Generates declarations and translators for `target` (`package@M.m`).
    ///
    /// The translation group holds every type of `package@M.x` with
    /// `x <= m`, keeping the newest minor version of each type name.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if `target` names a type rather
    /// than a package or no types exist for it, and propagates errors from
    /// the flattener and emitters.
    pub fn generate(
        &self,
        target: &QualifiedName,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<GeneratedFile>, CodegenError> {
        if target.is_fully_qualified() {
            return Err(CodegenError::generation(format!(
                "{target} names a type; only whole packages are converted"
            )));
        }
        let version = target.version();
        let group = self
            .graph
            .translation_group(target.package(), version.major, version.minor);
        if group.is_empty() {
            return Err(CodegenError::generation(format!(
                "no types found for {target}"
            )));
        }
        tracing::info!(
            "converting {} ({} types) to {}",
            target,
            group.len(),
            aidl_package(target)
        );

        let processed = process_group(self.graph, &group, diagnostics)?;
        let mut files = Vec::new();

        if self.config.emit_declarations {
            files.extend(
                DeclarationGenerator::new(self.graph, &processed, &self.config.replaced, diagnostics)
                    .license_header(&self.config.license_header)
                    .generate(&group)?,
            );
        }

        files.extend(
            TranslateGenerator::new(
                self.graph,
                &group,
                &processed,
                &self.config.replaced,
                diagnostics,
            )
            .license_header(&self.config.license_header)
            .generate(target, &self.config.backends)?,
        );

        tracing::info!("generated {} files for {}", files.len(), target);
        Ok(files)
    }
}
