//! Stowage - Save-Data Service
//!
//! TigerStyle: Accept a payload over HTTP and persist it to a pluggable
//! storage backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  handler        POST /save-data, GET /health (axum)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  service        validate → select → persist                 │
//! ├──────────────────────┬──────────────────────────────────────┤
//! │  validator           │  storage::StorageFactory             │
//! │                      │    FileStorage                       │
//! │                      │    DatabaseStorage ── connection     │
//! │                      │    MemoryStorage                     │
//! ├──────────────────────┴──────────────────────────────────────┤
//! │  server         owns the Connection, graceful shutdown      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every layer returns a classified error. Only the handler turns those
//! into HTTP status codes.

pub mod config;
pub mod connection;
pub mod constants;
pub mod handler;
pub mod request;
pub mod server;
pub mod service;
pub mod storage;
pub mod validator;

pub use constants::*;
pub use connection::{Connection, ConnectionConfig, ConnectionError, LocalConnection, SharedConnection};
pub use request::{SaveRequest, StorageKind};
pub use server::{AppServer, ServerError};
pub use service::{SaveError, SaveOutcome, SaveReceipt, SaveService};
pub use storage::{
    DatabaseStorage, DefaultStorageFactory, FileStorage, MemoryStorage, MemoryStore,
    PersistenceError, StorageFactory, StorageStrategy, UnsupportedStorageKind,
};
pub use validator::{RequestValidator, ValidationError};
