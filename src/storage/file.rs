//! FileStorage - Single-File Backend
//!
//! TigerStyle: Overwrite one file with the payload, all or nothing.
//!
//! The payload goes to a uniquely named sibling temp file first and is then
//! renamed over the target, so readers see either the old content or the new
//! content. Concurrent writers each use their own temp file; the last rename
//! wins.
//!
//! The rename replaces the directory entry itself: a symlink at the target
//! path is replaced by a regular file (the link's destination is left
//! untouched), and the new file gets default permissions rather than the old
//! file's mode.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{PersistenceError, StorageStrategy};

/// Stores the payload in a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file storage targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(!path.as_os_str().is_empty(), "file path cannot be empty");
        Self { path }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl StorageStrategy for FileStorage {
    async fn persist(&self, payload: &[u8]) -> Result<(), PersistenceError> {
        let temp = self.temp_path();

        if let Err(e) = fs::write(&temp, payload).await {
            let _ = fs::remove_file(&temp).await;
            return Err(PersistenceError::io(&temp, e));
        }

        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(PersistenceError::io(&self.path, e));
        }

        tracing::info!(path = %self.path.display(), bytes = payload.len(), "Data saved to file");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
