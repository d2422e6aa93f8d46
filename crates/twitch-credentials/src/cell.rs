use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::credentials::Credentials;
use crate::error::ProviderError;

pub type CredentialFuture = Shared<BoxFuture<'static, Result<Credentials, ProviderError>>>;

/// Single-holder container for a provider's current credentials.
///
/// Internally this always holds a [`Shared`] future: a freshly constructed
/// cell is pending on the initial load, and a refresh replaces it with a
/// new pending future. `Shared` memoizes its result once the inner future
/// resolves, so once settled a clone resolves instantly without re-polling
/// or re-running the load/refresh logic — there is no separate "settled"
/// representation to keep in sync with the pending one.
pub struct CredentialCell {
    current: Mutex<CredentialFuture>,
}

impl CredentialCell {
    pub fn new(initial: BoxFuture<'static, Result<Credentials, ProviderError>>) -> Self {
        Self {
            current: Mutex::new(initial.shared()),
        }
    }

    /// Atomically install a new pending (or already-resolved) future as the
    /// current value. Concurrent readers either observe the future as it
    /// was before this call or the new one — never a torn mix, since the
    /// swap itself is a single lock-guarded assignment.
    pub fn replace(&self, next: CredentialFuture) {
        *self.current.lock() = next;
    }

    pub async fn current(&self) -> Result<Credentials, ProviderError> {
        let snapshot = self.current.lock().clone();
        snapshot.await
    }
}
