//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use h2a::prelude::*;
//! ```

// Type graph
pub use h2a_schema::{
    CompoundStyle, Field, NamedType, NamedTypeKind, ParseError, QualifiedName, ScalarKind,
    SchemaError, Type, TypeGraph, TypeId, Version, parse_type_graph, parse_type_graph_file,
};

// Generation
pub use h2a_codegen::{
    Backend, CodegenError, Diagnostics, GeneratedFile, Generator, GeneratorConfig,
    ProcessedCompoundType, ReplacedTypeInfo, ReplacedTypes, generate_from_file,
    generate_from_xml, write_files,
};
pub use h2a_codegen::naming::{aidl_fq_name, aidl_name, aidl_package};
