//! App Server
//!
//! TigerStyle: Owns the process-wide connection and wires the request path.
//!
//! Lifecycle:
//! 1. `AppServer::new` connects to the database. Failure aborts here,
//!    before any listener exists.
//! 2. `bind` opens the listener.
//! 3. `serve` runs until the shutdown future resolves, lets in-flight
//!    requests finish, then closes the connection exactly once.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::connection::{self, ConnectionError, SharedConnection};
use crate::handler;
use crate::service::SaveService;
use crate::storage::{DefaultStorageFactory, MemoryStore};
use crate::validator::RequestValidator;

/// The assembled service plus the resources it owns.
pub struct AppServer {
    config: ServerConfig,
    connection: SharedConnection,
    memory: MemoryStore,
    service: Arc<SaveService>,
}

impl AppServer {
    /// Connect to the database and assemble the request path.
    ///
    /// # Errors
    /// Returns `ServerError::Connection` if the database cannot be reached.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let connection = connection::connect(&config.database).await?;
        Ok(Self::with_connection(config, connection))
    }

    /// Assemble the request path around an existing connection.
    #[must_use]
    pub fn with_connection(config: ServerConfig, connection: SharedConnection) -> Self {
        let memory = MemoryStore::new();
        let factory = DefaultStorageFactory::new(
            config.file_path.clone(),
            memory.clone(),
            connection.clone(),
        );
        let service = Arc::new(SaveService::new(Arc::new(factory), RequestValidator::new()));

        Self {
            config,
            connection,
            memory,
            service,
        }
    }

    /// Router serving every route.
    #[must_use]
    pub fn router(&self) -> Router {
        handler::router(self.service.clone())
    }

    /// The memory store backing the `memory` storage kind.
    #[must_use]
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Bind the configured address.
    ///
    /// # Errors
    /// Returns `ServerError::Bind` if the address is unavailable.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(self.config.bind)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.config.bind.to_string(),
                source,
            })
    }

    /// Serve until `shutdown` resolves, then close the connection.
    ///
    /// # Errors
    /// Returns the serve error if the server failed, otherwise any error
    /// from closing the connection.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("HTTP server listening on {}", addr);
        }

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        tracing::info!("Shutting down server...");
        let closed = self.connection.close().await;

        served.map_err(ServerError::Serve)?;
        closed.map_err(ServerError::Close)
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Server lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to initialize database: {0}")]
    Connection(#[from] ConnectionError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),

    #[error("failed to close database connection: {0}")]
    Close(ConnectionError),
}
