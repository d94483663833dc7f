//! HTTP client types for simPRO API communication.
//!
//! # Overview
//!
//! - [`SimproClient`]: the authenticated request executor
//! - [`HttpRequest`] / [`HttpResponse`]: request and response values
//! - [`Page`] / [`PageStream`] / [`Continuation`]: lazy pagination
//! - [`ListParams`]: shared collection listing options
//! - [`HttpError`]: unified request-execution errors
//!
//! # Retry behavior
//!
//! The executor retries exactly once, and only for a 401 that a
//! refresh-token exchange might cure. There is no backoff and no retry for
//! transient network errors; see [`SimproClient::execute`] for the full
//! protocol.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod paginated;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::SimproClient;
pub use http_request::{http_date, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, RESULT_PAGES_HEADER, RESULT_TOTAL_HEADER};
pub use paginated::{Continuation, ListParams, Page, PageStream};
