//! Storage Layer
//!
//! Reads and writes map/entity save files. The binary formats live in
//! [`codec`]; this module ties them to the filesystem and folds I/O and
//! decode failures into one [`StorageError`].

pub mod codec;
pub mod local;

use crate::world::{Entity, WorldGrids};
use codec::CodecError;
use local::LocalStorage;
use std::fmt;
use std::path::PathBuf;

/// Storage error types
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File or directory not found
    NotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// I/O error
    IoError(String),
    /// File read fine but its contents are not a valid save
    Codec(CodecError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(path) => write!(f, "not found: {}", path),
            StorageError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Codec(e) => write!(f, "bad save file: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::IoError(e.to_string()),
        }
    }
}

impl From<CodecError> for StorageError {
    fn from(e: CodecError) -> Self {
        StorageError::Codec(e)
    }
}

/// Save file access for the editor
///
/// Thin layer over [`LocalStorage`] that speaks grids and entities instead
/// of bytes.
#[derive(Debug, Clone)]
pub struct Storage {
    local: LocalStorage,
}

impl Storage {
    /// Storage rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { local: LocalStorage::with_base_dir(base_dir) }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.local.exists(path)
    }

    pub fn save_grids(&self, path: &str, grids: &WorldGrids) -> Result<(), StorageError> {
        self.local.write(path, &codec::encode_grids(grids))
    }

    pub fn load_grids(&self, path: &str) -> Result<WorldGrids, StorageError> {
        let bytes = self.local.read(path)?;
        Ok(codec::decode_grids(&bytes)?)
    }

    pub fn save_entities(&self, path: &str, entities: &[Entity]) -> Result<(), StorageError> {
        self.local.write(path, &codec::encode_entities(entities))
    }

    pub fn load_entities(&self, path: &str) -> Result<Vec<Entity>, StorageError> {
        let bytes = self.local.read(path)?;
        Ok(codec::decode_entities(&bytes)?)
    }
}
