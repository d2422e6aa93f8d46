use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;

use crate::credentials::RefreshableCredentials;
use crate::storage::PersistenceStore;

const SAVE_RETRY_BACKOFF_SECS: i64 = 60;

/// Wraps a [`PersistenceStore`] with retry-on-next-fetch semantics for save
/// failures. A save is always fire-and-forget relative to the caller that
/// triggered it: failures are logged once and absorbed, never surfaced
/// through `fetch`/`idempotent_refresh`.
pub struct PersistenceBridge {
    store: Arc<dyn PersistenceStore>,
    next_retry: Mutex<Option<DateTime<Utc>>>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self {
            store,
            next_retry: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<dyn PersistenceStore> {
        &self.store
    }

    /// Whether a prior save failed and enough time has passed to retry it.
    pub fn retry_due(&self, now: DateTime<Utc>) -> bool {
        matches!(*self.next_retry.lock(), Some(at) if now >= at)
    }

    pub fn clear_retry(&self) {
        *self.next_retry.lock() = None;
    }

    /// Attempt a save, absorbing failure: logs once and schedules a retry
    /// 60s out rather than propagating.
    pub async fn try_save(&self, credentials: &RefreshableCredentials, now: DateTime<Utc>) {
        match self.store.save_credentials(credentials).await {
            Ok(()) => self.clear_retry(),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    client_id = %credentials.client_id,
                    "failed to save credentials, will retry in 60s"
                );
                *self.next_retry.lock() =
                    Some(now + ChronoDuration::seconds(SAVE_RETRY_BACKOFF_SECS));
            }
        }
    }
}
