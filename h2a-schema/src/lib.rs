//! # h2a Schema
//!
//! Old-IDL type graph model and loader.
//!
//! This crate provides:
//! - Qualified, versioned type names
//! - Named types (structs, unions, safe unions, enums, typedefs, interfaces)
//! - A navigable type graph with scope back-references
//! - A loader for the XML interchange form of a pre-parsed type graph

pub mod error;
pub mod fqname;
pub mod graph;
pub mod parser;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use fqname::{QualifiedName, Version, capitalize};
pub use graph::TypeGraph;
pub use parser::{parse_type_graph, parse_type_graph_file};
pub use types::{
    CompoundStyle, CompoundType, EnumType, EnumValue, Field, NamedType, NamedTypeKind,
    ScalarKind, Type, TypeId,
};
