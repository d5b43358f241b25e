//! # h2a
//!
//! HIDL to AIDL conversion: declarations and value translators.
//!
//! h2a takes an already-parsed HIDL type graph and emits the equivalent AIDL
//! type declarations together with field-by-field translation functions that
//! convert runtime values from the HIDL representation to the AIDL one.
//!
//! ## Features
//!
//! - **Version flattening** - Fields inherited through older versions of a type are hoisted
//! - **Three backends** - NDK and CPP translators share a header, Java gets a `Translate` class
//! - **Range guards** - Unsigned scalars that may not fit the signed AIDL type are checked
//! - **Conversion log** - Everything that could not be translated is reported, never guessed
//!
//! ## Quick Start
//!
//! ```ignore
//! use h2a::prelude::*;
//! use std::path::Path;
//!
//! let graph = parse_type_graph_file(Path::new("types.xml"))?;
//! let diagnostics = Diagnostics::new();
//! let files = Generator::new(&graph)
//!     .generate(&QualifiedName::parse("android.hardware.foo@1.1")?, &diagnostics)?;
//! write_files(Path::new("out"), &files)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Qualified names, the type graph and its document loader
//! - [`codegen`] - Flattening, declaration and translator generation

pub mod prelude;

/// HIDL type graph model and loader.
pub mod schema {
    pub use h2a_schema::*;
}

/// AIDL declaration and translator generation.
pub mod codegen {
    pub use h2a_codegen::*;
}

// Re-export commonly used items at the crate root
pub use h2a_codegen::{
    Backend, CodegenError, Diagnostics, GeneratedFile, Generator, GeneratorConfig, write_files,
};
pub use h2a_schema::{ParseError, QualifiedName, TypeGraph, parse_type_graph, parse_type_graph_file};
