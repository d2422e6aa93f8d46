use std::path::PathBuf;

use async_trait::async_trait;

use crate::credentials::{LoadableCredentials, RefreshableCredentials};
use crate::error::PersistenceError;

use super::PersistenceStore;

/// Reads and writes a JSON-encoded credential file. No locking is
/// performed; running two providers against the same path concurrently is
/// undefined (treat the file as single-writer).
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PersistenceStore for FileStore {
    async fn load_credentials(&self) -> Result<LoadableCredentials, PersistenceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| PersistenceError::Load(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Load(e.to_string()))
    }

    async fn save_credentials(
        &self,
        credentials: &RefreshableCredentials,
    ) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(credentials)
            .map_err(|e| PersistenceError::Save(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| PersistenceError::Save(e.to_string()))
    }
}
