//! Storage - Strategy Trait and Backends
//!
//! TigerStyle: One capability, many interchangeable backends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  StorageFactory (selector)                   │
//! │            StorageKind → Box<dyn StorageStrategy>            │
//! └─────────────────────────────────────────────────────────────┘
//!          │                    │                     │
//! ┌────────┴──────┐   ┌────────┴────────┐   ┌────────┴───────┐
//! │  FileStorage  │   │ DatabaseStorage │   │ MemoryStorage  │
//! │  (one path)   │   │ (shared conn)   │   │ (shared store) │
//! └───────────────┘   └─────────────────┘   └────────────────┘
//! ```
//!
//! Adding a backend means a new [`StorageKind`](crate::StorageKind) variant,
//! a new strategy type, and one new arm in [`DefaultStorageFactory`].

mod database;
mod error;
mod factory;
mod file;
mod memory;

use async_trait::async_trait;

pub use database::DatabaseStorage;
pub use error::PersistenceError;
pub use factory::{DefaultStorageFactory, StorageFactory, UnsupportedStorageKind};
pub use file::FileStorage;
pub use memory::{MemoryStorage, MemoryStore};

/// A persistence backend.
///
/// `persist` either fully stores the payload or reports failure; callers
/// never see a partial write.
#[async_trait]
pub trait StorageStrategy: Send + Sync {
    /// Store the payload.
    async fn persist(&self, payload: &[u8]) -> Result<(), PersistenceError>;
}
