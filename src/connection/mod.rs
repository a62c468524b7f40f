//! Connection - Process-Owned Database Handle
//!
//! TigerStyle: One connection per process, created at startup, closed once at
//! shutdown.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Connection Trait                          │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴───────────┐
//! │ LocalConnection │           │ PostgresConnection │
//! │  (in-process)   │           │ (feature=postgres) │
//! └─────────────────┘           └────────────────────┘
//! ```
//!
//! The write primitive is shared by every concurrent request, so
//! implementations must synchronize internally. Callers add no locking.

mod config;
mod error;
mod local;

#[cfg(feature = "postgres")]
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{ConnectionConfig, DatabaseBackend};
pub use error::ConnectionError;
pub use local::{LocalConnection, WriteRecord};

#[cfg(feature = "postgres")]
pub use postgres::PostgresConnection;

/// A connection shared by reference across requests.
pub type SharedConnection = Arc<dyn Connection>;

/// Long-lived handle to an external persistence system.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Name of the database this connection targets.
    fn target(&self) -> &str;

    /// Whether the connection can currently accept writes.
    fn is_connected(&self) -> bool;

    /// Write a payload. Safe to call concurrently.
    async fn write(&self, payload: &[u8]) -> Result<(), ConnectionError>;

    /// Release the connection. Succeeds at most once.
    async fn close(&self) -> Result<(), ConnectionError>;
}

/// Establish the connection described by `config`.
///
/// # Errors
/// Returns error if the configuration is invalid, the backend is not
/// compiled in, or the database cannot be reached.
pub async fn connect(config: &ConnectionConfig) -> Result<SharedConnection, ConnectionError> {
    match config.backend {
        DatabaseBackend::Local => Ok(Arc::new(LocalConnection::connect(config)?)),
        #[cfg(feature = "postgres")]
        DatabaseBackend::Postgres => Ok(Arc::new(PostgresConnection::connect(config).await?)),
        #[cfg(not(feature = "postgres"))]
        DatabaseBackend::Postgres => Err(ConnectionError::BackendUnavailable("postgres")),
    }
}
