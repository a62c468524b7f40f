//! LocalConnection - In-Process Database Stand-In
//!
//! TigerStyle: Behaves like a connected database without leaving the
//! process. Writes are logged against the target database and the most
//! recent ones are retained for inspection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Connection, ConnectionConfig, ConnectionError};

/// Maximum write records retained
pub const LOCAL_WRITE_RECORDS_COUNT_MAX: usize = 1000;

/// A write accepted by a [`LocalConnection`].
#[derive(Debug, Clone)]
pub struct WriteRecord {
    /// Record ID
    pub id: Uuid,
    /// Payload as written
    pub payload: Vec<u8>,
    /// When the write was accepted
    pub written_at: DateTime<Utc>,
}

/// In-process connection used when no external database is configured.
#[derive(Debug)]
pub struct LocalConnection {
    host: String,
    port: u16,
    name: String,
    connected: AtomicBool,
    records: RwLock<VecDeque<WriteRecord>>,
    /// Total writes accepted, including evicted records
    write_count: AtomicU64,
}

impl LocalConnection {
    /// Establish a local connection.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the parameters are unusable.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        config.validate()?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            "Establishing database connection"
        );

        let conn = Self {
            host: config.host.clone(),
            port: config.port,
            name: config.name.clone(),
            connected: AtomicBool::new(true),
            records: RwLock::new(VecDeque::new()),
            write_count: AtomicU64::new(0),
        };

        tracing::info!(database = %conn.name, "Connected to database");
        Ok(conn)
    }

    /// Address this connection was opened against.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Retained write records, oldest first.
    pub async fn records(&self) -> Vec<WriteRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    /// Total writes accepted since connect.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for LocalConnection {
    fn target(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn write(&self, payload: &[u8]) -> Result<(), ConnectionError> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected);
        }

        let record = WriteRecord {
            id: Uuid::new_v4(),
            payload: payload.to_vec(),
            written_at: Utc::now(),
        };

        tracing::debug!(
            database = %self.name,
            record_id = %record.id,
            bytes = payload.len(),
            "Saving data to database"
        );

        let mut records = self.records.write().await;
        if records.len() >= LOCAL_WRITE_RECORDS_COUNT_MAX {
            records.pop_front();
        }
        records.push_back(record);
        self.write_count.fetch_add(1, Ordering::SeqCst);

        // Postcondition
        assert!(records.len() <= LOCAL_WRITE_RECORDS_COUNT_MAX);

        Ok(())
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(ConnectionError::AlreadyClosed);
        }
        tracing::info!(database = %self.name, "Closed database connection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_records_payload() {
        let conn = LocalConnection::connect(&ConnectionConfig::default()).unwrap();
        assert_eq!(conn.address(), "localhost:5432");

        conn.write(b"first").await.unwrap();
        conn.write(b"second").await.unwrap();

        let records = conn.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload, b"first");
        assert_eq!(records[1].payload, b"second");
        assert_eq!(conn.write_count(), 2);
    }

    #[tokio::test]
    async fn test_write_after_close_fails() {
        let conn = LocalConnection::connect(&ConnectionConfig::default()).unwrap();
        conn.close().await.unwrap();

        let result = conn.write(b"late").await;
        assert!(matches!(result, Err(ConnectionError::NotConnected)));
        assert!(conn.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_only_once() {
        let conn = LocalConnection::connect(&ConnectionConfig::default()).unwrap();
        assert!(conn.close().await.is_ok());
        assert!(matches!(conn.close().await, Err(ConnectionError::AlreadyClosed)));
    }

    #[tokio::test]
    async fn test_records_are_bounded() {
        let conn = LocalConnection::connect(&ConnectionConfig::default()).unwrap();
        for i in 0..LOCAL_WRITE_RECORDS_COUNT_MAX + 5 {
            conn.write(format!("{i}").as_bytes()).await.unwrap();
        }

        let records = conn.records().await;
        assert_eq!(records.len(), LOCAL_WRITE_RECORDS_COUNT_MAX);
        assert_eq!(records[0].payload, b"5");
        assert_eq!(conn.write_count(), (LOCAL_WRITE_RECORDS_COUNT_MAX + 5) as u64);
    }
}
