//! PostgresConnection - Production Database
//!
//! TigerStyle: Real database writes through a sqlx pool.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS saved_data (
//!     id UUID PRIMARY KEY,
//!     payload BYTEA NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{Connection, ConnectionConfig, ConnectionError};
use crate::constants::DATABASE_POOL_CONNECTIONS_MAX;

/// PostgreSQL connection backed by a pool.
///
/// The pool is internally synchronized, so concurrent writes need no extra
/// locking here.
pub struct PostgresConnection {
    pool: PgPool,
    name: String,
    connected: AtomicBool,
}

impl PostgresConnection {
    /// Connect and initialize the schema.
    ///
    /// # Errors
    /// Returns error if the database is unreachable or the schema cannot be
    /// created.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        config.validate()?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            "Establishing database connection"
        );

        let pool = PgPoolOptions::new()
            .max_connections(DATABASE_POOL_CONNECTIONS_MAX)
            .connect(&config.postgres_url())
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;

        Self::from_pool(pool, config.name.clone()).await
    }

    /// Wrap an existing pool.
    ///
    /// # Errors
    /// Returns error if the schema cannot be created.
    pub async fn from_pool(pool: PgPool, name: String) -> Result<Self, ConnectionError> {
        let conn = Self {
            pool,
            name,
            connected: AtomicBool::new(true),
        };
        conn.init_schema().await?;

        tracing::info!(database = %conn.name, "Connected to database");
        Ok(conn)
    }

    async fn init_schema(&self) -> Result<(), ConnectionError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_data (
                id UUID PRIMARY KEY,
                payload BYTEA NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ConnectionError::Connect(format!("failed to create schema: {e}")))?;

        Ok(())
    }

    /// Get the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    fn target(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.pool.is_closed()
    }

    async fn write(&self, payload: &[u8]) -> Result<(), ConnectionError> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected);
        }

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO saved_data (id, payload, created_at) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(payload)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| ConnectionError::Write(e.to_string()))?;

        tracing::debug!(database = %self.name, record_id = %id, bytes = payload.len(), "Saved row");
        Ok(())
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(ConnectionError::AlreadyClosed);
        }
        self.pool.close().await;
        tracing::info!(database = %self.name, "Closed database connection");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    fn test_db_url() -> Option<String> {
        std::env::var("TEST_POSTGRES_URL").ok()
    }

    macro_rules! require_db {
        () => {
            match test_db_url() {
                Some(url) => url,
                None => {
                    eprintln!("Skipping test: TEST_POSTGRES_URL not set");
                    return;
                }
            }
        };
    }

    async fn connect_url(url: &str) -> PostgresConnection {
        let pool = PgPoolOptions::new().max_connections(2).connect(url).await.unwrap();
        PostgresConnection::from_pool(pool, "test".to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_postgres_write_roundtrip() {
        let url = require_db!();
        let conn = connect_url(&url).await;

        let marker = Uuid::new_v4().to_string();
        conn.write(marker.as_bytes()).await.unwrap();

        let row = sqlx::query("SELECT payload FROM saved_data WHERE payload = $1")
            .bind(marker.as_bytes())
            .fetch_one(conn.pool())
            .await
            .unwrap();
        let payload: Vec<u8> = row.try_get("payload").unwrap();
        assert_eq!(payload, marker.as_bytes());

        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_postgres_write_after_close() {
        let url = require_db!();
        let conn = connect_url(&url).await;

        conn.close().await.unwrap();
        assert!(!conn.is_connected());
        assert!(matches!(conn.write(b"x").await, Err(ConnectionError::NotConnected)));
        assert!(matches!(conn.close().await, Err(ConnectionError::AlreadyClosed)));
    }
}
