//! Save Service
//!
//! TigerStyle: Transport-free orchestration of a save.
//!
//! Flow:
//! 1. Validate the request (yields the parsed storage kind)
//! 2. Ask the factory for a strategy
//! 3. Persist once
//!
//! Each step returns a classified error; nothing here knows about HTTP.

use std::sync::Arc;

use crate::request::{SaveRequest, StorageKind};
use crate::storage::{PersistenceError, StorageFactory, UnsupportedStorageKind};
use crate::validator::{RequestValidator, ValidationError};

/// Result of a save attempt.
pub type SaveOutcome = Result<SaveReceipt, SaveError>;

/// What a successful save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Backend that stored the payload
    pub kind: StorageKind,
    /// Payload length in bytes
    pub bytes: usize,
}

/// Orchestrates validation, selection and persistence.
pub struct SaveService {
    factory: Arc<dyn StorageFactory>,
    validator: RequestValidator,
}

impl SaveService {
    /// Create a service from its collaborators.
    pub fn new(factory: Arc<dyn StorageFactory>, validator: RequestValidator) -> Self {
        Self { factory, validator }
    }

    /// Validate and persist a request.
    pub async fn save_data(&self, req: &SaveRequest) -> SaveOutcome {
        let kind = self.validator.validate(req).map_err(|e| match e {
            ValidationError::UnsupportedStorageKind(kind) => {
                SaveError::UnsupportedStorageKind(UnsupportedStorageKind(kind))
            }
            other => SaveError::Validation(other),
        })?;

        let storage = self.factory.create_storage(kind)?;

        storage
            .persist(&req.payload)
            .await
            .map_err(|source| SaveError::Persistence { kind, source })?;

        Ok(SaveReceipt {
            kind,
            bytes: req.payload.len(),
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Classified save failure
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    #[error(transparent)]
    UnsupportedStorageKind(#[from] UnsupportedStorageKind),

    #[error("failed to save data to {kind}: {source}")]
    Persistence {
        kind: StorageKind,
        #[source]
        source: PersistenceError,
    },
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, ConnectionConfig, LocalConnection};
    use crate::constants::MEMORY_KEY_DEFAULT;
    use crate::storage::{DefaultStorageFactory, MemoryStore, StorageStrategy};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        path: std::path::PathBuf,
        memory: MemoryStore,
        conn: Arc<LocalConnection>,
        service: SaveService,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let memory = MemoryStore::new();
        let conn = Arc::new(LocalConnection::connect(&ConnectionConfig::default()).unwrap());
        let factory = DefaultStorageFactory::new(&path, memory.clone(), conn.clone());
        let service = SaveService::new(Arc::new(factory), RequestValidator::new());
        Fixture {
            _dir: dir,
            path,
            memory,
            conn,
            service,
        }
    }

    /// Factory that counts how many strategies it hands out.
    #[derive(Default)]
    struct CountingFactory {
        created: AtomicUsize,
    }

    impl StorageFactory for CountingFactory {
        fn create_storage(
            &self,
            kind: StorageKind,
        ) -> Result<Box<dyn StorageStrategy>, UnsupportedStorageKind> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Err(UnsupportedStorageKind(kind.to_string()))
        }
    }

    #[tokio::test]
    async fn test_saves_to_every_backend() {
        let f = fixture();
        let payload = b"\x00binary\xffpayload".to_vec();

        for kind in StorageKind::all() {
            let req = SaveRequest::new(payload.clone(), kind.as_str());
            let receipt = f.service.save_data(&req).await.unwrap();
            assert_eq!(receipt.kind, *kind);
            assert_eq!(receipt.bytes, payload.len());
        }

        assert_eq!(tokio::fs::read(&f.path).await.unwrap(), payload);
        assert_eq!(f.conn.records().await[0].payload, payload);
        assert_eq!(f.memory.get(MEMORY_KEY_DEFAULT).await, Some(payload));
    }

    #[tokio::test]
    async fn test_empty_payload_is_validation_error() {
        let f = fixture();
        for kind in ["file", "database", "memory", "redis", ""] {
            let result = f.service.save_data(&SaveRequest::new(Vec::new(), kind)).await;
            assert!(
                matches!(result, Err(SaveError::Validation(ValidationError::EmptyPayload))),
                "kind {kind:?}"
            );
        }
        assert!(!f.path.exists());
        assert_eq!(f.conn.write_count(), 0);
        assert!(f.memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_kind_never_reaches_factory() {
        let factory = Arc::new(CountingFactory::default());
        let service = SaveService::new(factory.clone(), RequestValidator::new());

        let result = service.save_data(&SaveRequest::new(b"Hello".to_vec(), "redis")).await;
        let err = result.unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedStorageKind(_)));
        assert_eq!(err.to_string(), "unsupported storage kind: redis");
        assert_eq!(factory.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_factory_without_mapping() {
        let factory = Arc::new(CountingFactory::default());
        let service = SaveService::new(factory.clone(), RequestValidator::new());

        let result = service.save_data(&SaveRequest::new(b"Hello".to_vec(), "file")).await;
        assert!(matches!(result, Err(SaveError::UnsupportedStorageKind(_))));
        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_closed_connection_is_persistence_error() {
        let f = fixture();
        f.conn.close().await.unwrap();

        let result = f.service.save_data(&SaveRequest::new(b"row".to_vec(), "database")).await;
        match result {
            Err(SaveError::Persistence { kind, source }) => {
                assert_eq!(kind, StorageKind::Database);
                assert!(matches!(source, PersistenceError::NotConnected));
            }
            other => panic!("expected persistence error, got {other:?}"),
        }
        assert_eq!(f.conn.write_count(), 0);
    }

    #[tokio::test]
    async fn test_file_and_memory_saves_run_concurrently() {
        let f = fixture();

        let file_req = SaveRequest::new(b"to file".to_vec(), "file");
        let memory_req = SaveRequest::new(b"to memory".to_vec(), "memory");
        let (file_result, memory_result) = tokio::join!(
            f.service.save_data(&file_req),
            f.service.save_data(&memory_req)
        );

        assert!(file_result.is_ok());
        assert!(memory_result.is_ok());
        assert_eq!(tokio::fs::read(&f.path).await.unwrap(), b"to file");
        assert_eq!(f.memory.get(MEMORY_KEY_DEFAULT).await, Some(b"to memory".to_vec()));
    }
}
