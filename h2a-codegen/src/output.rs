//! Generated artifacts and writing them to disk.

use crate::error::CodegenError;
use std::path::{Path, PathBuf};

/// One generated file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

impl GeneratedFile {
    /// Creates a generated file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Writes every file under `root`, creating directories as needed.
///
/// # Errors
/// Returns `CodegenError::Io` if a directory or file cannot be written.
pub fn write_files(root: &Path, files: &[GeneratedFile]) -> Result<(), CodegenError> {
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &file.contents)?;
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}
