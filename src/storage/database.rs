//! DatabaseStorage - Shared Connection Backend

use async_trait::async_trait;

use super::{PersistenceError, StorageStrategy};
use crate::connection::{ConnectionError, SharedConnection};

/// Hands the payload to the process-wide connection.
///
/// Holds a shared reference only; the server owns the connection's
/// lifecycle.
#[derive(Clone)]
pub struct DatabaseStorage {
    connection: SharedConnection,
}

impl DatabaseStorage {
    /// Create a database storage over a shared connection.
    #[must_use]
    pub fn new(connection: SharedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl StorageStrategy for DatabaseStorage {
    async fn persist(&self, payload: &[u8]) -> Result<(), PersistenceError> {
        if !self.connection.is_connected() {
            return Err(PersistenceError::NotConnected);
        }

        match self.connection.write(payload).await {
            Ok(()) => {
                tracing::info!(
                    database = %self.connection.target(),
                    bytes = payload.len(),
                    "Data saved to database"
                );
                Ok(())
            }
            // Closed between the check and the write
            Err(ConnectionError::NotConnected) => Err(PersistenceError::NotConnected),
            Err(e) => Err(e.into()),
        }
    }
}
