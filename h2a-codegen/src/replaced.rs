//! Override table for old-IDL types this generator does not emit itself.
//!
//! A replaced type maps to an existing new-IDL type (usually a builtin) and may
//! carry its own field translation snippet.

use crate::writer::CodeWriter;
use h2a_schema::QualifiedName;
use std::collections::HashMap;

/// Emits the translation of a field whose type is replaced.
pub type FieldSnippet = fn(&mut CodeWriter);

/// Replacement for one old-IDL type.
#[derive(Debug, Clone)]
pub struct ReplacedTypeInfo {
    /// New-IDL type used in declarations.
    pub aidl_type: String,
    /// Custom field translation, if the type can be translated at all.
    pub translate_field: Option<FieldSnippet>,
}

/// Lookup table keyed by qualified name.
#[derive(Debug, Clone)]
pub struct ReplacedTypes {
    entries: HashMap<String, ReplacedTypeInfo>,
}

impl ReplacedTypes {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, fq_name: impl Into<String>, info: ReplacedTypeInfo) {
        self.entries.insert(fq_name.into(), info);
    }

    /// Looks up the replacement for a type.
    #[must_use]
    pub fn get(&self, fq_name: &QualifiedName) -> Option<&ReplacedTypeInfo> {
        self.entries.get(&fq_name.to_string())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReplacedTypes {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(
            "android.hidl.safe_union@1.0::Monostate",
            ReplacedTypeInfo {
                aidl_type: "boolean".to_string(),
                translate_field: Some(|out| {
                    out.line("// Nothing to translate for Monostate.");
                }),
            },
        );
        table
    }
}
