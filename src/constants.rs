//! TigerStyle Constants
//!
//! Limits and defaults shared across the service. Units are part of the name.

// =============================================================================
// HTTP
// =============================================================================

/// Default HTTP bind address
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8080";

/// Route for saving payloads
pub const SAVE_DATA_PATH: &str = "/save-data";

/// Route for health checks
pub const HEALTH_PATH: &str = "/health";

/// Message returned on a successful save
pub const SAVE_SUCCESS_MESSAGE: &str = "Data saved successfully";

// =============================================================================
// Payload
// =============================================================================

/// Maximum decoded payload length in bytes (1 MiB)
pub const PAYLOAD_BYTES_MAX: usize = 1024 * 1024;

/// Maximum request body length in bytes.
///
/// Base64 inflates by 4/3; the extra 4 KiB covers the JSON envelope.
pub const REQUEST_BODY_BYTES_MAX: usize = PAYLOAD_BYTES_MAX / 3 * 4 + 4 + 4096;

// =============================================================================
// Storage
// =============================================================================

/// Default target file for file storage
pub const FILE_STORAGE_PATH_DEFAULT: &str = "data.txt";

/// Key under which memory storage keeps the latest payload
pub const MEMORY_KEY_DEFAULT: &str = "data";

/// Maximum number of keys held by the memory store
pub const MEMORY_ENTRIES_COUNT_MAX: usize = 1024;

/// Maximum size of a single memory store value in bytes
pub const MEMORY_VALUE_BYTES_MAX: usize = PAYLOAD_BYTES_MAX;

// =============================================================================
// Database
// =============================================================================

/// Default database host
pub const DATABASE_HOST_DEFAULT: &str = "localhost";

/// Default database port
pub const DATABASE_PORT_DEFAULT: u16 = 5432;

/// Default database user
pub const DATABASE_USER_DEFAULT: &str = "admin";

/// Default database password
pub const DATABASE_PASSWORD_DEFAULT: &str = "password123";

/// Default database name
pub const DATABASE_NAME_DEFAULT: &str = "app_database";

/// Maximum connections in the postgres pool
pub const DATABASE_POOL_CONNECTIONS_MAX: u32 = 10;

// =============================================================================
// Application
// =============================================================================

/// Application name
pub const APP_NAME: &str = "stowage";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
