//! HTTP-specific error types for the simPRO API client.
//!
//! The client uses specific error types for different failure scenarios:
//!
//! - [`HttpResponseError`]: a non-2xx response from a resource endpoint,
//!   after the single refresh-and-retry rule has been exhausted
//! - [`InvalidHttpRequestError`]: a request that fails validation before
//!   it is sent
//! - [`HttpError`]: the unified error type for all request execution
//!   failures, including the unauthenticated-session and
//!   missing-pagination-header cases

use thiserror::Error;

use crate::auth::AuthError;

/// Error returned when a request receives a non-successful response.
///
/// Carries the status code and the raw response body for diagnostics. A
/// 304 from a conditional fetch also surfaces through this type so the
/// caller can observe it.
#[derive(Debug, Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The response body, serialized for diagnostics.
    pub body: String,
}

/// Error returned when a request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PATCH request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for request execution.
///
/// # Example
///
/// ```rust,ignore
/// match client.execute(request).await {
///     Ok(response) => println!("{}", response.body),
///     Err(HttpError::AuthenticationRequired) => { /* log in first */ }
///     Err(HttpError::Response(e)) => println!("API error {}: {}", e.status, e.body),
///     Err(e) => println!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// Auth headers were requested but no login exchange has completed.
    #[error("Authentication required: no session token has been established.")]
    AuthenticationRequired,

    /// A non-2xx response after exhausting the single-retry rule.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// A paginated response arrived without its pagination headers.
    #[error("Paginated response is missing the '{header}' header.")]
    PaginationHeaderMissing {
        /// The absent header name.
        header: &'static str,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// A token exchange failed before the request could be sent.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The response body could not be decoded as the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
