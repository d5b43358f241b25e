//! # h2a Codegen
//!
//! New-IDL declarations and old-to-new translators from an old-IDL type graph.
//!
//! This crate provides:
//! - Name and package mapping between the two IDLs
//! - Field flattening across version inheritance
//! - `.aidl` declaration generation
//! - Translator generation for the NDK, CPP and Java backends
//! - A shared diagnostics log of untranslatable constructs

pub mod aidl;
pub mod diagnostics;
pub mod error;
pub mod flatten;
pub mod generator;
pub mod naming;
pub mod output;
pub mod replaced;
pub mod translate;
pub mod writer;

pub use diagnostics::Diagnostics;
pub use error::CodegenError;
pub use flatten::{FlattenedField, ProcessedCompoundType, ProcessedTypes};
pub use generator::{Generator, GeneratorConfig};
pub use output::{GeneratedFile, write_files};
pub use replaced::{ReplacedTypeInfo, ReplacedTypes};
pub use translate::Backend;

use h2a_schema::QualifiedName;

/// Generates every artifact for `target` from a type graph document string.
///
/// # Arguments
/// * `xml` - Type graph document content
/// * `target` - Package version to convert, e.g. `android.hardware.foo@1.1`
/// * `diagnostics` - Log receiving conversion notes
///
/// # Returns
/// The generated files, paths relative to the output root.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    target: &str,
    diagnostics: &Diagnostics,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let graph = h2a_schema::parse_type_graph(xml)?;
    let target = QualifiedName::parse(target)?;
    Generator::new(&graph).generate(&target, diagnostics)
}

/// Generates every artifact for `target` from a type graph document file.
///
/// # Arguments
/// * `path` - Path to the type graph document
/// * `target` - Package version to convert
/// * `diagnostics` - Log receiving conversion notes
///
/// # Returns
/// The generated files, paths relative to the output root.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    target: &str,
    diagnostics: &Diagnostics,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, target, diagnostics)
}
