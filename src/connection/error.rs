//! Connection errors

/// Connection-level failures
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("invalid connection config: {0}")]
    InvalidConfig(String),

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("connection not established")]
    NotConnected,

    #[error("connection already closed")]
    AlreadyClosed,

    #[error("write failed: {0}")]
    Write(String),

    #[error("database backend not compiled in: {0}")]
    BackendUnavailable(&'static str),
}
