//! Storage Factory - Kind to Strategy Selection

use std::path::PathBuf;

use super::{DatabaseStorage, FileStorage, MemoryStorage, MemoryStore, StorageStrategy};
use crate::connection::SharedConnection;
use crate::request::StorageKind;

/// Maps a storage kind to a strategy instance.
///
/// Implementations hold any shared resources by reference and never own
/// their lifecycle.
pub trait StorageFactory: Send + Sync {
    /// Build the strategy for `kind`.
    ///
    /// # Errors
    /// Returns `UnsupportedStorageKind` if this factory has no mapping for
    /// `kind`.
    fn create_storage(
        &self,
        kind: StorageKind,
    ) -> Result<Box<dyn StorageStrategy>, UnsupportedStorageKind>;
}

/// Factory covering every built-in backend.
#[derive(Clone)]
pub struct DefaultStorageFactory {
    file_path: PathBuf,
    memory: MemoryStore,
    connection: SharedConnection,
}

impl DefaultStorageFactory {
    /// Create a factory.
    pub fn new(file_path: impl Into<PathBuf>, memory: MemoryStore, connection: SharedConnection) -> Self {
        Self {
            file_path: file_path.into(),
            memory,
            connection,
        }
    }
}

impl StorageFactory for DefaultStorageFactory {
    fn create_storage(
        &self,
        kind: StorageKind,
    ) -> Result<Box<dyn StorageStrategy>, UnsupportedStorageKind> {
        let storage: Box<dyn StorageStrategy> = match kind {
            StorageKind::File => Box::new(FileStorage::new(self.file_path.clone())),
            StorageKind::Database => Box::new(DatabaseStorage::new(self.connection.clone())),
            StorageKind::Memory => Box::new(MemoryStorage::new(self.memory.clone())),
        };
        Ok(storage)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// No strategy is registered for the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported storage kind: {0}")]
pub struct UnsupportedStorageKind(pub String);

// =============================================================================
// Tests
// =============================================================================
