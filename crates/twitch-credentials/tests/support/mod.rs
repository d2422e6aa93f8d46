//! Shared test doubles for the integration suite: a scriptable refresh
//! client, token-info client, and in-memory store, each wrapped in a
//! counter so tests can assert on call counts (P1/P2/S3).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use twitch_credentials::{
    AccessTokenResponse, Clock, HydrationError, LoadableCredentials, PersistenceError,
    RefreshError, RefreshableCredentials, TokenInfo, storage::PersistenceStore,
};

pub struct ScriptedRefreshClient {
    pub calls: AtomicUsize,
    responses: Mutex<Vec<Result<AccessTokenResponse, RefreshError>>>,
}

impl ScriptedRefreshClient {
    pub fn new(responses: Vec<Result<AccessTokenResponse, RefreshError>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl twitch_credentials::RefreshClient for ScriptedRefreshClient {
    async fn refresh_user_token(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _refresh_token: &str,
    ) -> Result<AccessTokenResponse, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            panic!("ScriptedRefreshClient ran out of scripted responses");
        }
        responses.remove(0)
    }
}

/// A refresh client whose call never resolves, for tests asserting on
/// in-flight refresh-map entries.
pub struct HangingRefreshClient;

#[async_trait]
impl twitch_credentials::RefreshClient for HangingRefreshClient {
    async fn refresh_user_token(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _refresh_token: &str,
    ) -> Result<AccessTokenResponse, RefreshError> {
        std::future::pending().await
    }
}

pub struct StubTokenInfoClient {
    pub scopes: Vec<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl StubTokenInfoClient {
    pub fn permanent() -> Self {
        Self {
            scopes: vec!["chat:read".to_string()],
            expiry_date: None,
        }
    }
}

#[async_trait]
impl twitch_credentials::TokenInfoClient for StubTokenInfoClient {
    async fn get_token_info(
        &self,
        _access_token: &str,
        client_id: &str,
    ) -> Result<TokenInfo, HydrationError> {
        Ok(TokenInfo {
            client_id: client_id.to_string(),
            login: Some("someuser".to_string()),
            scopes: self.scopes.clone(),
            user_id: Some("123".to_string()),
            expiry_date: self.expiry_date,
            expires_in: self.expiry_date.map(|_| 3600),
        })
    }
}

pub struct InMemoryStore {
    initial: LoadableCredentials,
    pub saves: Mutex<Vec<RefreshableCredentials>>,
    fail_saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new(initial: LoadableCredentials) -> Self {
        Self {
            initial,
            saves: Mutex::new(Vec::new()),
            fail_saves: AtomicUsize::new(0),
        }
    }

    /// The next `n` saves will fail with a persistence error.
    pub fn fail_next_saves(&self, n: usize) {
        self.fail_saves.store(n, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn load_credentials(&self) -> Result<LoadableCredentials, PersistenceError> {
        Ok(self.initial.clone())
    }

    async fn save_credentials(
        &self,
        credentials: &RefreshableCredentials,
    ) -> Result<(), PersistenceError> {
        let remaining = self.fail_saves.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_saves.store(remaining - 1, Ordering::SeqCst);
            return Err(PersistenceError::Save("simulated disk failure".to_string()));
        }
        self.saves.lock().push(credentials.clone());
        Ok(())
    }
}

pub fn loadable_full(access_token: &str, expiry: DateTime<Utc>) -> LoadableCredentials {
    LoadableCredentials {
        client_id: "c".to_string(),
        access_token: access_token.to_string(),
        client_secret: Some("s".to_string()),
        refresh_token: Some("r0".to_string()),
        scopes: Some(vec!["chat:read".to_string()]),
        expiry_date: Some(expiry),
        expires_in: Some(3600),
        timestamp: Some(expiry - chrono::Duration::hours(1)),
        expiry_date_known: true,
    }
}

/// A clock fixed at `instant`, for tests that only need a single point in
/// time rather than the full advance/set seam of `TestClock`.
pub fn fixed_clock(instant: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(twitch_credentials::TestClock::new(instant))
}
