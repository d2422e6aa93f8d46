use async_trait::async_trait;

use crate::credentials::{LoadableCredentials, RefreshableCredentials};
use crate::error::PersistenceError;

use super::PersistenceStore;

/// Holds a single constructor-supplied, non-refreshable credential.
/// `save_credentials` always fails — there is no store to write to, and
/// the refresh coordinator never calls it because refresh itself is
/// impossible on a static credential.
pub struct StaticStore {
    credentials: LoadableCredentials,
}

impl StaticStore {
    pub fn new(credentials: LoadableCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl PersistenceStore for StaticStore {
    async fn load_credentials(&self) -> Result<LoadableCredentials, PersistenceError> {
        Ok(self.credentials.clone())
    }

    async fn save_credentials(
        &self,
        _credentials: &RefreshableCredentials,
    ) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unsupported)
    }
}
