//! An OAuth2 credential provider for a single Twitch application identity.
//!
//! A [`Provider`] holds the current canonical credential set and serves it
//! on demand via [`Provider::fetch`], transparently refreshing the access
//! token when it is close to or past expiry. The hard part is not the HTTP
//! refresh call itself (delegated to a caller-supplied [`RefreshClient`])
//! but the concurrency discipline around it: many callers may request
//! credentials simultaneously, the access token is a versioned resource,
//! and the upstream refresh endpoint is sensitive to double-spending a
//! refresh token. `Provider` guarantees:
//!
//! - at most one in-flight refresh per superseded access token
//!   ([`Provider::idempotent_refresh`]),
//! - idempotent behavior when a caller retries with a stale token,
//! - graceful degradation when the persistence layer fails transiently,
//! - eventual pruning of refresh history so the process does not leak
//!   memory.
//!
//! This crate does not perform interactive auth flows (device code,
//! authorization code), does not manage more than one credential set per
//! `Provider`, and does not enforce upstream scope policy — it reports
//! what it has and lets callers decide.

mod cell;
mod clients;
mod clock;
mod credentials;
mod error;
mod hydrator;
mod persistence;
mod provider;
mod pruner;
mod refresh_map;
pub mod storage;

pub use clients::{AccessTokenResponse, RefreshClient, TokenInfo, TokenInfoClient};
pub use clock::{Clock, SharedClock, SystemClock, TestClock, system_clock};
pub use credentials::{Credentials, LoadableCredentials, RefreshableCredentials};
pub use error::{HydrationError, PersistenceError, ProviderError, RefreshError};
pub use provider::{Provider, ProviderConfig};
