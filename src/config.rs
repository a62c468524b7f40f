//! Configuration
//!
//! TigerStyle: CLI flags with environment fallbacks. A `.env` file, if
//! present, is loaded by the binary before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::connection::{ConnectionConfig, DatabaseBackend};
use crate::constants::{
    APP_NAME, DATABASE_HOST_DEFAULT, DATABASE_NAME_DEFAULT, DATABASE_PASSWORD_DEFAULT,
    DATABASE_PORT_DEFAULT, DATABASE_USER_DEFAULT, FILE_STORAGE_PATH_DEFAULT,
    HTTP_BIND_ADDRESS_DEFAULT,
};

// =============================================================================
// CLI
// =============================================================================

/// Save-data HTTP service with pluggable storage backends
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Save-data HTTP service with pluggable storage backends")]
#[command(version)]
pub struct Cli {
    /// HTTP bind address
    #[arg(short, long, env = "STOWAGE_BIND", default_value = HTTP_BIND_ADDRESS_DEFAULT)]
    pub bind: String,

    /// Target file for the `file` storage kind
    #[arg(long, env = "STOWAGE_FILE_PATH", default_value = FILE_STORAGE_PATH_DEFAULT)]
    pub file_path: String,

    /// Database connection implementation
    #[arg(long, env = "STOWAGE_DB_BACKEND", value_enum, default_value_t = DatabaseBackend::Local)]
    pub db_backend: DatabaseBackend,

    /// Database host
    #[arg(long, env = "STOWAGE_DB_HOST", default_value = DATABASE_HOST_DEFAULT)]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "STOWAGE_DB_PORT", default_value_t = DATABASE_PORT_DEFAULT)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "STOWAGE_DB_USER", default_value = DATABASE_USER_DEFAULT)]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "STOWAGE_DB_PASSWORD", default_value = DATABASE_PASSWORD_DEFAULT, hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "STOWAGE_DB_NAME", default_value = DATABASE_NAME_DEFAULT)]
    pub db_name: String,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter for the requested verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Resolve into a server configuration.
    ///
    /// # Errors
    /// Returns error if the bind address does not parse.
    pub fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let bind: SocketAddr = self
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind.clone()))?;

        let file_path = PathBuf::from(shellexpand::tilde(&self.file_path).into_owned());

        Ok(ServerConfig {
            bind,
            file_path,
            database: ConnectionConfig {
                backend: self.db_backend,
                host: self.db_host.clone(),
                port: self.db_port,
                user: self.db_user.clone(),
                password: self.db_password.clone(),
                name: self.db_name.clone(),
            },
        })
    }
}

// =============================================================================
// Server Config
// =============================================================================

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address
    pub bind: SocketAddr,
    /// Target file for file storage
    pub file_path: PathBuf,
    /// Database connection parameters
    pub database: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            file_path: PathBuf::from(FILE_STORAGE_PATH_DEFAULT),
            database: ConnectionConfig::default(),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
}

// =============================================================================
// Tests
// =============================================================================
