//! Fills in metadata (scopes, expiry) missing from a freshly loaded
//! credential by calling the identity service's introspection endpoint.

use crate::clients::TokenInfoClient;
use crate::credentials::{Credentials, LoadableCredentials};
use crate::error::ProviderError;

/// Hydrates `loadable` if it is missing scopes or a known expiry, otherwise
/// returns it unchanged. A missing `expires_in` from the identity service
/// means "permanent or unknown validity" and is represented as
/// `expiry_date = None`; such credentials never trigger automatic refresh.
pub async fn hydrate(
    loadable: LoadableCredentials,
    token_info_client: &dyn TokenInfoClient,
) -> Result<Credentials, ProviderError> {
    if !loadable.needs_hydration() {
        return loadable
            .into_credentials()
            .ok_or_else(|| ProviderError::Fatal("failed to hydrate missing data".to_string()));
    }

    tracing::debug!(client_id = %loadable.client_id, "hydrating credentials via token info");
    let info = token_info_client
        .get_token_info(&loadable.access_token, &loadable.client_id)
        .await?;

    let mut loadable = loadable;
    loadable.scopes = Some(info.scopes);
    loadable.expiry_date = info.expiry_date;
    loadable.expiry_date_known = true;
    if let Some(expires_in) = info.expires_in {
        loadable.expires_in = Some(expires_in);
        loadable.timestamp = Some(chrono::Utc::now());
    }

    loadable
        .into_credentials()
        .ok_or_else(|| ProviderError::Fatal("failed to hydrate missing data".to_string()))
}
