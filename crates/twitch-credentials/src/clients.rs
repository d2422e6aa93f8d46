//! Contracts for the external identity-service collaborators. The provider
//! never speaks HTTP directly; it drives these traits, the same way
//! `PlatformExtractor` in the platform extractors crate drives a
//! `reqwest::Client` it is handed rather than owning transport concerns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{HydrationError, RefreshError};

/// Result of a successful `refreshUserToken` call.
#[derive(Debug, Clone)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub scopes: Vec<String>,
    pub expires_in: u64,
    pub obtained_at: DateTime<Utc>,
}

/// Result of a successful `getTokenInfo` call.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub client_id: String,
    pub login: Option<String>,
    pub scopes: Vec<String>,
    pub user_id: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub expires_in: Option<u64>,
}

/// Drives the upstream OAuth2 refresh endpoint. Implementations own the
/// actual HTTP transport and rate-limit handling; this crate only assumes
/// the contract below.
#[async_trait]
pub trait RefreshClient: Send + Sync {
    async fn refresh_user_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<AccessTokenResponse, RefreshError>;
}

/// Drives the upstream token-introspection endpoint, used only during
/// hydration of a freshly loaded [`crate::credentials::LoadableCredentials`].
#[async_trait]
pub trait TokenInfoClient: Send + Sync {
    async fn get_token_info(
        &self,
        access_token: &str,
        client_id: &str,
    ) -> Result<TokenInfo, HydrationError>;
}
