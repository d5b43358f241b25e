//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Type graph parse error.
    #[error("type graph parse error: {0}")]
    Parse(#[from] h2a_schema::ParseError),

    /// Type graph lookup error.
    #[error("schema error: {0}")]
    Schema(#[from] h2a_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },

    /// Field type with no new-IDL equivalent.
    #[error("unsupported type '{type_name}' in '{context}'")]
    UnsupportedType {
        /// Rendered type.
        type_name: String,
        /// Qualified name of the type being mapped for.
        context: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }
}
