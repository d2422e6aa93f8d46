//! The canonical credential record and the two narrower shapes callers use
//! to hand credentials to, and receive them from, a [`crate::Provider`].

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// The full credential record the provider holds internally and returns
/// from [`crate::Provider::fetch`].
///
/// `expiry_date = None` means "never expires, or validity is unknown" —
/// such a record is never auto-refreshed on time grounds (see
/// [`Credentials::needs_refresh`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub access_token: String,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub scopes: Vec<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub expires_in: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Whether this record carries both the client secret and refresh token
    /// needed to drive a refresh.
    pub fn is_refreshable(&self) -> bool {
        self.client_secret.is_some() && self.refresh_token.is_some()
    }

    /// Convert into [`RefreshableCredentials`] if both fields are present.
    pub fn into_refreshable(self) -> Option<RefreshableCredentials> {
        let client_secret = self.client_secret.clone()?;
        let refresh_token = self.refresh_token.clone()?;
        Some(RefreshableCredentials {
            client_id: self.client_id,
            access_token: self.access_token,
            client_secret,
            refresh_token,
            scopes: self.scopes,
            expiry_date: self.expiry_date,
            expires_in: self.expires_in,
            timestamp: self.timestamp,
            expiry_date_known: true,
        })
    }

    /// Whether `scope` is present in this record's scope list.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Whether `now` is within `padding` of `expiry_date`, or past it.
    /// Always `false` for a record with no expiry (policy: unknown/permanent
    /// validity never triggers automatic refresh).
    pub fn needs_refresh(&self, now: DateTime<Utc>, padding: ChronoDuration) -> bool {
        match self.expiry_date {
            None => false,
            Some(expiry) => now + padding >= expiry,
        }
    }
}

/// The subset an external store must supply on load. Everything beyond
/// `client_id`/`access_token` is optional and filled in by the hydrator on
/// first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadableCredentials {
    pub client_id: String,
    pub access_token: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// `None` means "not supplied, needs hydration"; `Some(vec![])` means
    /// "supplied, and empty" and is left alone by the hydrator.
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Distinguishes "expiry_date was present as a property and null" from
    /// "expiry_date was absent entirely" — only the latter triggers
    /// hydration per the spec's hydration condition.
    #[serde(default)]
    pub expiry_date_known: bool,
}

impl LoadableCredentials {
    pub fn needs_hydration(&self) -> bool {
        self.scopes.is_none() || !self.expiry_date_known
    }

    /// Build the final [`Credentials`] once any missing fields have been
    /// hydrated. Fails if `client_id`/`access_token` are empty.
    pub fn into_credentials(self) -> Option<Credentials> {
        if self.client_id.is_empty() || self.access_token.is_empty() {
            return None;
        }
        Some(Credentials {
            client_id: self.client_id,
            access_token: self.access_token,
            client_secret: self.client_secret,
            refresh_token: self.refresh_token,
            scopes: self.scopes.unwrap_or_default(),
            expiry_date: self.expiry_date,
            expires_in: self.expires_in,
            timestamp: self.timestamp,
        })
    }
}

/// The fully-populated record a refresh is driven from and produces.
/// Only a `RefreshableCredentials` may be passed to
/// `RefreshClient::refresh_user_token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshableCredentials {
    pub client_id: String,
    pub access_token: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub scopes: Vec<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub expires_in: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Always `true`: a `RefreshableCredentials` is by construction already
    /// fully hydrated. Carried so a file a [`crate::storage::FileStore`]
    /// wrote round-trips through [`LoadableCredentials::needs_hydration`]
    /// without looking like it still needs hydrating.
    #[serde(default = "default_true")]
    pub expiry_date_known: bool,
}

fn default_true() -> bool {
    true
}

impl RefreshableCredentials {
    pub fn into_credentials(self) -> Credentials {
        Credentials {
            client_id: self.client_id,
            access_token: self.access_token,
            client_secret: Some(self.client_secret),
            refresh_token: Some(self.refresh_token),
            scopes: self.scopes,
            expiry_date: self.expiry_date,
            expires_in: self.expires_in,
            timestamp: self.timestamp,
        }
    }
}

impl From<RefreshableCredentials> for Credentials {
    fn from(value: RefreshableCredentials) -> Self {
        value.into_credentials()
    }
}
