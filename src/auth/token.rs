//! Bearer token state for an authenticated simPRO session.
//!
//! This module provides [`TokenState`], the value holding the current
//! bearer credential, and [`TokenResponse`], the wire form returned by the
//! token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default clock skew applied when deciding whether a token is near expiry.
///
/// Refreshing this far ahead of the server-side deadline absorbs network
/// and clock latency so a request is never sent with a token the server
/// would reject.
pub const DEFAULT_EXPIRY_SKEW: Duration = Duration::seconds(4);

/// The body returned by the token endpoint for both the `password` and
/// `refresh_token` grants.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    /// The bearer access token.
    pub access_token: String,
    /// The refresh token for obtaining the next access token.
    pub refresh_token: String,
    /// The authentication scheme name, e.g. `"Bearer"`.
    pub token_type: String,
    /// Seconds until the access token expires, relative to receipt.
    pub expires_in: i64,
}

/// The current bearer credential and its expiry instant.
///
/// A `TokenState` is created from a [`TokenResponse`] at the moment the
/// response is received (`expires_at = now + expires_in`, computed exactly
/// once) and is only ever replaced wholesale on refresh, never partially
/// mutated.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use simpro_api::auth::{TokenResponse, TokenState, DEFAULT_EXPIRY_SKEW};
///
/// let response = TokenResponse {
///     access_token: "abc".to_string(),
///     refresh_token: "def".to_string(),
///     token_type: "Bearer".to_string(),
///     expires_in: 3600,
/// };
/// let token = TokenState::from_response(&response, Utc::now());
/// assert!(!token.is_near_expiry(Utc::now(), DEFAULT_EXPIRY_SKEW));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenState {
    /// The bearer access token.
    pub access_token: String,
    /// The refresh token for the next refresh grant.
    pub refresh_token: String,
    /// The authentication scheme name paired with the access token.
    pub token_type: String,
    /// The absolute instant at which the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Builds a `TokenState` from a token-endpoint response received at
    /// `received_at`.
    ///
    /// The expiry instant is derived here and nowhere else.
    #[must_use]
    pub fn from_response(response: &TokenResponse, received_at: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone(),
            token_type: response.token_type.clone(),
            expires_at: received_at + Duration::seconds(response.expires_in),
        }
    }

    /// Returns `true` when `now + skew` has reached the expiry instant.
    ///
    /// Callers normally pass [`DEFAULT_EXPIRY_SKEW`].
    #[must_use]
    pub fn is_near_expiry(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew >= self.expires_at
    }

    /// Formats the value for an `Authorization` header,
    /// e.g. `"Bearer abc123"`.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

// Verify TokenState is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenState>();
};
