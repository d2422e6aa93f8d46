//! P9 (hydration): a `LoadableCredentials` with absent scopes is populated
//! via `get_token_info` before the first `fetch()` returns.

mod support;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use twitch_credentials::{
    Clock, HydrationError, LoadableCredentials, Provider, ProviderConfig, TestClock, TokenInfo,
    TokenInfoClient,
};

use support::{InMemoryStore, ScriptedRefreshClient};

struct RecordingTokenInfo {
    scopes: Vec<String>,
}

#[async_trait]
impl TokenInfoClient for RecordingTokenInfo {
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
            expiry_date: None,
            expires_in: None,
        })
    }
}

fn config_at(now: chrono::DateTime<Utc>) -> ProviderConfig {
    let clock: Arc<dyn Clock> = Arc::new(TestClock::new(now));
    ProviderConfig {
        refresh_padding: StdDuration::from_millis(500),
        expiry_age: StdDuration::from_secs(86_400),
        prune_interval: StdDuration::from_secs(3600),
        clock,
    }
}

#[tokio::test]
async fn p9_missing_scopes_are_hydrated_before_first_fetch_returns() {
    let now = Utc.with_ymd_and_hms(2021, 4, 15, 0, 0, 0).unwrap();
    let loadable = LoadableCredentials {
        client_id: "c".to_string(),
        access_token: "a0".to_string(),
        client_secret: Some("s".to_string()),
        refresh_token: Some("r0".to_string()),
        scopes: None,
        expiry_date: None,
        expires_in: None,
        timestamp: None,
        expiry_date_known: false,
    };
    let store = Arc::new(InMemoryStore::new(loadable));
    let provider = Provider::new(
        store,
        Arc::new(ScriptedRefreshClient::new(vec![])),
        Arc::new(RecordingTokenInfo {
            scopes: vec!["chat:read".to_string(), "chat:edit".to_string()],
        }),
        config_at(now),
    );

    let creds = provider.fetch().await.unwrap();
    assert_eq!(creds.scopes, vec!["chat:read", "chat:edit"]);
    assert!(creds.has_scope("chat:edit"));
}

#[tokio::test]
async fn p9_hydrated_record_is_opportunistically_persisted() {
    let now = Utc.with_ymd_and_hms(2021, 4, 15, 0, 0, 0).unwrap();
    let loadable = LoadableCredentials {
        client_id: "c".to_string(),
        access_token: "a0".to_string(),
        client_secret: Some("s".to_string()),
        refresh_token: Some("r0".to_string()),
        scopes: None,
        expiry_date: None,
        expires_in: None,
        timestamp: None,
        expiry_date_known: false,
    };
    let store = Arc::new(InMemoryStore::new(loadable));
    let provider = Provider::new(
        store.clone(),
        Arc::new(ScriptedRefreshClient::new(vec![])),
        Arc::new(RecordingTokenInfo {
            scopes: vec!["chat:read".to_string()],
        }),
        config_at(now),
    );

    let _ = provider.fetch().await.unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.save_count(), 1);
}
