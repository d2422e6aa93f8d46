use async_trait::async_trait;

use crate::credentials::{LoadableCredentials, RefreshableCredentials};
use crate::error::PersistenceError;

use super::PersistenceStore;

/// Holds a single constructor-supplied, refreshable credential in memory.
/// `save_credentials` is a no-op — nothing outlives the process, so there
/// is nowhere to persist to, but unlike [`super::StaticStore`] refresh is
/// supported.
pub struct MemoryStore {
    credentials: LoadableCredentials,
}

impl MemoryStore {
    pub fn new(credentials: LoadableCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn load_credentials(&self) -> Result<LoadableCredentials, PersistenceError> {
        Ok(self.credentials.clone())
    }

    async fn save_credentials(
        &self,
        _credentials: &RefreshableCredentials,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }
}
