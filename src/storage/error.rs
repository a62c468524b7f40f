//! Persistence errors

use crate::connection::ConnectionError;

/// Backend-level failure while persisting a payload.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("file write failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection not established")]
    NotConnected,

    #[error("database write failed: {0}")]
    Database(#[from] ConnectionError),

    #[error("memory store exhausted: {0}")]
    Exhausted(String),
}

impl PersistenceError {
    /// Create an I/O error for a path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create an exhaustion error.
    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::Exhausted(msg.into())
    }
}
