use thiserror::Error;

/// Errors returned by the identity service's refresh endpoint.
#[derive(Debug, Error, Clone)]
pub enum RefreshError {
    #[error("network error refreshing token: {0}")]
    Network(String),
    #[error("identity service rejected the refresh: {0}")]
    Rejected(String),
    #[error("refresh response missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors returned by the identity service's token-info (hydration) endpoint.
#[derive(Debug, Error, Clone)]
pub enum HydrationError {
    #[error("network error fetching token info: {0}")]
    Network(String),
    #[error("token info response was not well-formed: {0}")]
    MalformedResponse(String),
}

/// Errors returned by a [`crate::storage::PersistenceStore`] implementation.
#[derive(Debug, Error, Clone)]
pub enum PersistenceError {
    #[error("store does not support saving credentials")]
    Unsupported,
    #[error("failed to load credentials: {0}")]
    Load(String),
    #[error("failed to save credentials: {0}")]
    Save(String),
}

/// The error type surfaced from [`crate::Provider::fetch`] and
/// [`crate::Provider::idempotent_refresh`].
///
/// Persistence failures never appear here: they are absorbed internally
/// (logged, retried opportunistically) per the provider's persistence
/// resilience contract.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    /// Configuration or contract violation: not recoverable by the provider
    /// itself. Covers expired static credentials, a refresh attempted
    /// without a client secret/refresh token, a stale or unknown token
    /// passed to `idempotent_refresh`, and malformed upstream responses.
    #[error("{0}")]
    Fatal(String),

    #[error("refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("hydration failed: {0}")]
    Hydration(#[from] HydrationError),

    /// The initial `load_credentials` call failed; the provider is
    /// effectively unusable until reconstructed.
    #[error("failed to load initial credentials: {0}")]
    LoadFailed(String),
}

impl From<PersistenceError> for ProviderError {
    fn from(value: PersistenceError) -> Self {
        ProviderError::LoadFailed(value.to_string())
    }
}
