//! Storage variants a [`crate::Provider`] can be built on top of.

mod file_store;
mod memory_store;
mod static_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use static_store::StaticStore;

use async_trait::async_trait;

use crate::credentials::{LoadableCredentials, RefreshableCredentials};
use crate::error::PersistenceError;

/// The storage contract a `Provider` is parameterized over. Implementers
/// supply both halves; the `Static` variant implements only the load half
/// meaningfully and always fails to save.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn load_credentials(&self) -> Result<LoadableCredentials, PersistenceError>;

    async fn save_credentials(
        &self,
        credentials: &RefreshableCredentials,
    ) -> Result<(), PersistenceError>;
}
