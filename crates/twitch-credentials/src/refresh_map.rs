use std::collections::HashMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::future::{BoxFuture, Shared};

use crate::credentials::RefreshableCredentials;
use crate::error::ProviderError;

pub type RefreshFuture = Shared<BoxFuture<'static, Result<RefreshableCredentials, ProviderError>>>;

/// The idempotency index keyed by superseded access tokens.
///
/// A value is a `Shared` future rather than an explicit in-flight/settled
/// tag: `Shared` already memoizes its result once the refresh completes, so
/// a "settled" entry is simply one whose future has already resolved.
/// [`Shared::peek`] lets [`RefreshMap::prune`] tell the two cases apart
/// without re-polling or re-running anything.
#[derive(Default)]
pub struct RefreshMap {
    entries: HashMap<String, RefreshFuture>,
}

impl RefreshMap {
    /// Atomically check-and-insert: returns the existing future for
    /// `old_access_token` if present, otherwise installs `make()` and
    /// returns it. Must be called while holding the map's lock for the
    /// whole operation — that exclusivity is what guarantees at most one
    /// in-flight refresh per token.
    pub fn get_or_insert_with(
        &mut self,
        old_access_token: &str,
        make: impl FnOnce() -> RefreshFuture,
    ) -> (RefreshFuture, bool) {
        if let Some(existing) = self.entries.get(old_access_token) {
            return (existing.clone(), false);
        }
        let fut = make();
        self.entries.insert(old_access_token.to_string(), fut.clone());
        (fut, true)
    }

    pub fn remove(&mut self, old_access_token: &str) {
        self.entries.remove(old_access_token);
    }

    /// Evict settled entries whose `expiry_date + expiry_age` is in the
    /// past. In-flight entries are never touched.
    pub fn prune(&mut self, now: DateTime<Utc>, expiry_age: ChronoDuration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, fut| match fut.peek() {
            None => true,
            Some(Err(_)) => true,
            Some(Ok(record)) => match record.expiry_date {
                None => true,
                Some(expiry) => now < expiry + expiry_age,
            },
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn contains(&self, old_access_token: &str) -> bool {
        self.entries.contains_key(old_access_token)
    }
}
