//! OAuth2 grant exchange against the simPRO token endpoint.
//!
//! simPRO issues tokens through two grants: `password` for the initial
//! login and `refresh_token` for every refresh after that. Both are sent
//! form-encoded with the configured `client_id`/`client_secret`.
//!
//! A 400 or 401 from the token endpoint means the credentials themselves
//! were rejected and surfaces as [`AuthError::LogonFailure`], distinct from
//! the generic HTTP error a resource endpoint produces.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::auth::token::{TokenResponse, TokenState};
use crate::config::SimproConfig;

/// Grant type for the initial username/password exchange.
const PASSWORD_GRANT_TYPE: &str = "password";

/// Grant type for refresh requests.
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Errors raised by the token endpoint exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the credentials (HTTP 400 or 401).
    #[error("Logon failure ({status}): {body}")]
    LogonFailure {
        /// The HTTP status returned by the token endpoint.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The token endpoint returned an unexpected non-success status.
    #[error("Token endpoint error ({status}): {body}")]
    TokenEndpoint {
        /// The HTTP status returned by the token endpoint.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The token endpoint returned a body that could not be decoded.
    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(String),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Form body for the `password` grant.
#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Form body for the `refresh_token` grant.
#[derive(Debug, Serialize)]
struct RefreshGrantRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    refresh_token: &'a str,
}

/// Exchanges a username and password for the first [`TokenState`] of a
/// session.
///
/// # Errors
///
/// - [`AuthError::LogonFailure`] when the endpoint answers 400 or 401
/// - [`AuthError::TokenEndpoint`] for any other non-success status
/// - [`AuthError::Network`] / [`AuthError::MalformedTokenResponse`] for
///   transport and decode failures
pub async fn login(
    http: &reqwest::Client,
    config: &SimproConfig,
    username: &str,
    password: &str,
) -> Result<TokenState, AuthError> {
    let body = PasswordGrantRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: PASSWORD_GRANT_TYPE,
        username,
        password,
    };
    exchange(http, config, &body).await
}

/// Exchanges a refresh token for a replacement [`TokenState`].
///
/// # Errors
///
/// Same taxonomy as [`login`]; a rejected refresh token is a
/// [`AuthError::LogonFailure`].
pub async fn refresh(
    http: &reqwest::Client,
    config: &SimproConfig,
    refresh_token: &str,
) -> Result<TokenState, AuthError> {
    let body = RefreshGrantRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: REFRESH_TOKEN_GRANT_TYPE,
        refresh_token,
    };
    exchange(http, config, &body).await
}

/// Posts a grant request and derives the new token state.
///
/// The expiry instant is pinned to the moment the response is received;
/// nothing downstream recomputes it.
async fn exchange<B: Serialize>(
    http: &reqwest::Client,
    config: &SimproConfig,
    body: &B,
) -> Result<TokenState, AuthError> {
    let response = http.post(config.token_url()).form(body).send().await?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        if status == 400 || status == 401 {
            return Err(AuthError::LogonFailure { status, body });
        }
        return Err(AuthError::TokenEndpoint { status, body });
    }

    let received_at = Utc::now();
    let token_response: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::MalformedTokenResponse(e.to_string()))?;

    Ok(TokenState::from_response(&token_response, received_at))
}
