//! Error types for type graph loading and lookups.

use thiserror::Error;

/// Error type for type graph document parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// A type expression references a name that does not exist in the graph.
    #[error("unknown type '{type_name}' referenced from '{scope}'")]
    UnknownType {
        /// Type expression as written.
        type_name: String,
        /// Qualified name of the referencing scope.
        scope: String,
    },

    /// Malformed qualified name.
    #[error("invalid qualified name '{name}': {reason}")]
    InvalidName {
        /// Offending text.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Invalid document structure.
    #[error("invalid type graph structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// Graph construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for type graph construction and lookups.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Type not found.
    #[error("type '{name}' not found")]
    TypeNotFound {
        /// Qualified type name.
        name: String,
    },

    /// Two named types share the same qualified name.
    #[error("duplicate definition of '{name}'")]
    Duplicate {
        /// Qualified type name.
        name: String,
    },

    /// An aggregate was required but another kind of type was found.
    #[error("type '{name}' is a {kind}, not a struct or union")]
    NotCompound {
        /// Qualified type name.
        name: String,
        /// Kind actually found.
        kind: &'static str,
    },

    /// A type alias chain loops back on itself.
    #[error("circular type alias detected at '{name}'")]
    CircularAlias {
        /// Qualified name where the cycle was detected.
        name: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates an invalid qualified name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
