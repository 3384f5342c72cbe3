//! Local filesystem storage backend
//!
//! Save files live next to the editor (or under a configured base
//! directory). All operations are synchronous.

use super::StorageError;
use std::path::PathBuf;

/// Local filesystem storage backend
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths (`data_dir` from the config)
    base_dir: PathBuf,
}

impl LocalStorage {
    /// Create a local storage backend with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a path relative to the base directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Read a whole file
    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    /// Create or overwrite a file
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);

        // Ensure parent directory exists
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&full_path, data)?;
        Ok(())
    }

    /// Check if a file exists
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
