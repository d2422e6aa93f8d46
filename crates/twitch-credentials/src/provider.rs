use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration as ChronoDuration;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;

use crate::cell::CredentialCell;
use crate::clients::{RefreshClient, TokenInfoClient};
use crate::clock::{SharedClock, system_clock};
use crate::credentials::{Credentials, RefreshableCredentials};
use crate::error::ProviderError;
use crate::hydrator::hydrate;
use crate::persistence::PersistenceBridge;
use crate::pruner::Pruner;
use crate::refresh_map::{RefreshFuture, RefreshMap};
use crate::storage::PersistenceStore;

/// Tunables for a [`Provider`]. Defaults match the upstream identity
/// service's defaults: 500ms refresh padding, 24h refresh-map retention,
/// a 5 minute prune tick.
#[derive(Clone)]
pub struct ProviderConfig {
    pub refresh_padding: StdDuration,
    pub expiry_age: StdDuration,
    pub prune_interval: StdDuration,
    pub clock: SharedClock,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            refresh_padding: StdDuration::from_millis(500),
            expiry_age: StdDuration::from_secs(86_400),
            prune_interval: StdDuration::from_secs(300),
            clock: system_clock(),
        }
    }
}

fn to_chrono(d: StdDuration) -> ChronoDuration {
    ChronoDuration::from_std(d).unwrap_or_else(|_| ChronoDuration::zero())
}

/// Short, non-secret log fingerprint for an access token.
fn fingerprint(token: &str) -> String {
    token.chars().take(8).collect()
}

pub(crate) struct ProviderInner {
    cell: CredentialCell,
    refresh_map: Mutex<RefreshMap>,
    persistence: Arc<PersistenceBridge>,
    refresh_client: Arc<dyn RefreshClient>,
    token_info_client: Arc<dyn TokenInfoClient>,
    clock: SharedClock,
    refresh_padding: ChronoDuration,
    expiry_age: ChronoDuration,
}

/// An OAuth2 credential provider for a single Twitch credential set.
///
/// Holds the current canonical credentials and serves them on demand via
/// [`Provider::fetch`], transparently refreshing the access token when it
/// is close to or past expiry. At most one refresh is ever in flight per
/// superseded access token, and retrying [`Provider::idempotent_refresh`]
/// with a token that has already been superseded returns the same result
/// without re-consuming the refresh token. See the crate docs for the full
/// concurrency contract.
pub struct Provider {
    inner: Arc<ProviderInner>,
    _pruner: Pruner,
}

impl Provider {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        refresh_client: Arc<dyn RefreshClient>,
        token_info_client: Arc<dyn TokenInfoClient>,
        config: ProviderConfig,
    ) -> Self {
        let persistence = Arc::new(PersistenceBridge::new(store));
        let clock = config.clock.clone();

        let initial_load = build_initial_load(
            persistence.clone(),
            token_info_client.clone(),
            clock.clone(),
        );

        let inner = Arc::new(ProviderInner {
            cell: CredentialCell::new(initial_load),
            refresh_map: Mutex::new(RefreshMap::default()),
            persistence,
            refresh_client,
            token_info_client,
            clock,
            refresh_padding: to_chrono(config.refresh_padding),
            expiry_age: to_chrono(config.expiry_age),
        });

        let pruner = Pruner::spawn(inner.clone(), config.prune_interval);
        Self {
            inner,
            _pruner: pruner,
        }
    }

    /// Returns the current credentials, refreshing first if the access
    /// token is within the configured padding of expiry, or already
    /// expired.
    pub async fn fetch(&self) -> Result<Credentials, ProviderError> {
        self.inner.fetch().await
    }

    /// Idempotently refreshes the token superseding `old_access_token`.
    /// Concurrent and repeated callers naming the same superseded token
    /// observe the same result and trigger exactly one upstream refresh
    /// call. Fails fatally if `old_access_token` is neither the current
    /// token nor already tracked as superseded.
    pub async fn idempotent_refresh(
        &self,
        old_access_token: &str,
    ) -> Result<RefreshableCredentials, ProviderError> {
        self.inner.idempotent_refresh(old_access_token).await
    }

    /// Number of entries currently tracked in the refresh idempotency map.
    /// Exposed for tests that assert on pruning and single-flight behavior
    /// rather than coupling to private fields.
    pub fn refresh_map_len(&self) -> usize {
        self.inner.refresh_map.lock().len()
    }

    /// Runs one pruning pass immediately instead of waiting for the
    /// background pruner's next tick. Exposed for deterministic tests.
    pub fn prune_refresh_map_for_test(&self) -> usize {
        self.inner.prune_refresh_map()
    }
}

fn build_initial_load(
    persistence: Arc<PersistenceBridge>,
    token_info_client: Arc<dyn TokenInfoClient>,
    clock: SharedClock,
) -> BoxFuture<'static, Result<Credentials, ProviderError>> {
    async move {
        // Yield once so a builder/subclass can finish wiring itself up
        // before the load races ahead.
        tokio::task::yield_now().await;

        let loadable = persistence
            .store()
            .load_credentials()
            .await
            .map_err(ProviderError::from)?;
        let needed_hydration = loadable.needs_hydration();
        let credentials = hydrate(loadable, token_info_client.as_ref()).await?;

        if needed_hydration {
            if let Some(refreshable) = credentials.clone().into_refreshable() {
                let persistence = persistence.clone();
                let now = clock.now();
                tokio::spawn(async move {
                    persistence.try_save(&refreshable, now).await;
                });
            }
        }

        Ok(credentials)
    }
    .boxed()
}

impl ProviderInner {
    pub(crate) fn prune_refresh_map(&self) -> usize {
        let now = self.clock.now();
        self.refresh_map.lock().prune(now, self.expiry_age)
    }

    async fn fetch(self: &Arc<Self>) -> Result<Credentials, ProviderError> {
        let cur = self.cell.current().await?;

        if cur.expiry_date.is_none() {
            // Unknown/permanent validity: never auto-refresh.
            return Ok(cur);
        }

        let now = self.clock.now();

        if !cur.needs_refresh(now, self.refresh_padding) {
            if self.persistence.retry_due(now) {
                self.spawn_opportunistic_save(&cur, now);
            }
            return Ok(cur);
        }

        if !cur.is_refreshable() {
            return Err(ProviderError::Fatal(
                "static credentials have expired".to_string(),
            ));
        }

        let refreshed = self.idempotent_refresh(&cur.access_token).await?;
        Ok(refreshed.into_credentials())
    }

    fn spawn_opportunistic_save(&self, cur: &Credentials, now: chrono::DateTime<chrono::Utc>) {
        if let Some(refreshable) = cur.clone().into_refreshable() {
            let persistence = self.persistence.clone();
            tokio::spawn(async move {
                persistence.try_save(&refreshable, now).await;
            });
        }
    }

    async fn idempotent_refresh(
        self: &Arc<Self>,
        old_access_token: &str,
    ) -> Result<RefreshableCredentials, ProviderError> {
        // Snapshot the cell's value before claiming the refresh-map slot.
        // The spawned future below must not re-read the cell itself: by
        // the time it runs the cell may already point at that very future
        // (installed a few lines down), and awaiting it from inside its
        // own body would deadlock.
        let cur = self.cell.current().await?;

        let (fut, is_new) = {
            let mut map = self.refresh_map.lock();
            map.get_or_insert_with(old_access_token, || {
                self.spawn_refresh(old_access_token.to_string(), cur.clone())
            })
        };

        if is_new {
            // Synchronous from here through clearing the retry stamp: no
            // other caller can observe a half-installed refresh.
            self.cell.replace(as_credential_future(fut.clone()));
            self.persistence.clear_retry();
        }

        fut.await
    }

    fn spawn_refresh(self: &Arc<Self>, old_access_token: String, cur: Credentials) -> RefreshFuture {
        let inner = Arc::clone(self);

        async move {
            if !cur.is_refreshable() {
                inner.refresh_map.lock().remove(&old_access_token);
                return Err(ProviderError::Fatal(
                    "cannot refresh: credentials are missing a client secret or refresh token"
                        .to_string(),
                ));
            }

            if cur.access_token != old_access_token {
                inner.refresh_map.lock().remove(&old_access_token);
                tracing::warn!(
                    old_token = %fingerprint(&old_access_token),
                    "refresh was called with a stale or unknown access token"
                );
                return Err(ProviderError::Fatal(
                    "refresh was called with a stale or unknown access token".to_string(),
                ));
            }

            let client_id = cur.client_id.clone();
            let client_secret = cur
                .client_secret
                .clone()
                .expect("checked by is_refreshable");
            let refresh_token = cur
                .refresh_token
                .clone()
                .expect("checked by is_refreshable");

            let response = match inner
                .refresh_client
                .refresh_user_token(&client_id, &client_secret, &refresh_token)
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    inner.refresh_map.lock().remove(&old_access_token);
                    tracing::error!(error = %err, client_id = %client_id, "token refresh failed");
                    // Transient failure, not a rejection of `cur` itself: the
                    // cell must not keep pointing at this now-memoized `Err`,
                    // or every later `fetch()` would replay it forever
                    // instead of attempting a fresh refresh.
                    inner.cell.replace(ready_credential_future(cur.clone()));
                    return Err(ProviderError::from(err));
                }
            };

            let record = RefreshableCredentials {
                client_id,
                access_token: response.access_token,
                client_secret,
                refresh_token: response.refresh_token,
                scopes: response.scopes,
                expiry_date: Some(
                    response.obtained_at + ChronoDuration::seconds(response.expires_in as i64),
                ),
                expires_in: Some(response.expires_in),
                timestamp: Some(response.obtained_at),
                expiry_date_known: true,
            };

            tracing::debug!(
                client_id = %record.client_id,
                old_token = %fingerprint(&old_access_token),
                new_token = %fingerprint(&record.access_token),
                "token refresh succeeded"
            );

            let persistence = inner.persistence.clone();
            let now = inner.clock.now();
            let record_for_save = record.clone();
            tokio::spawn(async move {
                persistence.try_save(&record_for_save, now).await;
            });

            Ok(record)
        }
        .boxed()
        .shared()
    }
}

fn as_credential_future(fut: RefreshFuture) -> crate::cell::CredentialFuture {
    fut.map(|result| result.map(Credentials::from)).boxed().shared()
}

/// A cell future that resolves immediately to `cur`, used to restore the
/// cell after a transient refresh failure so the next `fetch()` retries
/// instead of replaying a memoized error.
fn ready_credential_future(cur: Credentials) -> crate::cell::CredentialFuture {
    futures::future::ready(Ok(cur)).boxed().shared()
}
