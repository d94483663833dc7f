//! The authenticated request executor for the simPRO API.
//!
//! This module provides [`SimproClient`], which owns the session token,
//! injects auth headers, classifies responses, and implements the
//! single-refresh-then-retry protocol for expired credentials.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::auth::{oauth, AuthError, TokenState, DEFAULT_EXPIRY_SKEW};
use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::paginated::{Continuation, ListParams, Page, PageStream};
use crate::config::SimproConfig;

/// An authenticated client for one simPRO session.
///
/// The client holds the session's [`TokenState`] behind a lock so that a
/// refresh is an atomic whole-value replacement and concurrent refreshes
/// coalesce into a single in-flight exchange. Cloning the client is cheap
/// and shares the same session.
///
/// # Request lifecycle
///
/// 1. If proactive refresh is enabled and the token is near expiry, the
///    token is refreshed before sending; a failure here is fatal to the
///    call and the request is not attempted.
/// 2. `Authorization` and `Content-Type: application/json` are injected;
///    caller-supplied headers win on collision.
/// 3. A 2xx response is decoded and returned. A 401 on the first attempt
///    triggers one refresh-token exchange and one replay of the original
///    request; any further failure is terminal. Every other non-2xx status
///    surfaces immediately with no retry.
///
/// Transient network failures are not retried here; that responsibility
/// belongs to the transport.
///
/// # Example
///
/// ```rust,ignore
/// let client = SimproClient::new(config);
/// client.login("user", "password").await?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "sites/12")
///     .build()?;
/// let response = client.execute(request).await?;
/// ```
#[derive(Clone)]
pub struct SimproClient {
    http: reqwest::Client,
    config: Arc<SimproConfig>,
    api_base: String,
    token: Arc<Mutex<Option<TokenState>>>,
    proactive_refresh: bool,
    expiry_skew: Duration,
}

// Verify SimproClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SimproClient>();
};

impl SimproClient {
    /// Creates an unauthenticated client for the configured build.
    ///
    /// Requests that need auth headers fail with
    /// [`HttpError::AuthenticationRequired`] until [`login`](Self::login)
    /// or [`with_token`](Self::with_token) establishes a session.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g. TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: SimproConfig) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");
        let api_base = config.api_base_url();

        Self {
            http,
            config: Arc::new(config),
            api_base,
            token: Arc::new(Mutex::new(None)),
            proactive_refresh: true,
            expiry_skew: DEFAULT_EXPIRY_SKEW,
        }
    }

    /// Creates a client with a previously stored token installed, skipping
    /// the login exchange.
    #[must_use]
    pub fn with_token(config: SimproConfig, token: TokenState) -> Self {
        let client = Self::new(config);
        if let Ok(mut guard) = client.token.try_lock() {
            *guard = Some(token);
        }
        client
    }

    /// Disables or re-enables proactive refresh of near-expiry tokens.
    #[must_use]
    pub const fn proactive_refresh(mut self, enabled: bool) -> Self {
        self.proactive_refresh = enabled;
        self
    }

    /// Returns the company-scoped API root requests are issued against.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns a snapshot of the current token state, if a session exists.
    pub async fn token(&self) -> Option<TokenState> {
        self.token.lock().await.clone()
    }

    /// Performs the password-grant login exchange and installs the first
    /// token of this session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LogonFailure`] when the token endpoint rejects
    /// the credentials (400/401), or another [`AuthError`] for transport
    /// and decode failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let token = oauth::login(&self.http, &self.config, username, password).await?;
        let mut guard = self.token.lock().await;
        *guard = Some(token);
        Ok(())
    }

    /// Executes a request with auth-header injection and the
    /// single-refresh-then-retry protocol.
    ///
    /// # Errors
    ///
    /// - [`HttpError::AuthenticationRequired`] when no session exists
    /// - [`HttpError::Auth`] when a proactive refresh fails before sending
    /// - [`HttpError::Response`] for any non-2xx outcome after the retry
    ///   rule is exhausted (including 304 from a conditional fetch)
    /// - [`HttpError::InvalidRequest`] / [`HttpError::Network`] for
    ///   validation and transport failures
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        if self.proactive_refresh && self.near_expiry().await? {
            // Fatal to this call on failure; the request is not attempted.
            self.refresh().await?;
        }

        let url = format!("{}/{}", self.api_base, request.path);

        // Explicit guard: exactly one replay per call, no matter how the
        // refresh turns out.
        let mut retried = false;
        loop {
            let response = self.send(&request, &url).await?;

            if response.status == 401 && !retried {
                retried = true;
                match self.refresh().await {
                    Ok(()) => {
                        tracing::debug!(path = %request.path, "retrying after token refresh");
                        continue;
                    }
                    Err(refresh_error) => {
                        // Surface the original 401; the refresh's own
                        // failure reason is attached to the log, not lost.
                        tracing::warn!(
                            path = %request.path,
                            error = %refresh_error,
                            "token refresh after 401 failed"
                        );
                        return Err(HttpError::Response(Self::response_error(&response)));
                    }
                }
            }

            if response.is_ok() {
                return Ok(response);
            }
            return Err(HttpError::Response(Self::response_error(&response)));
        }
    }

    /// Fetches one page of a paginated collection.
    ///
    /// Adds `page`/`pageSize` query parameters and the listing options,
    /// then parses the `Result-Pages`/`Result-Total` headers.
    ///
    /// # Errors
    ///
    /// [`HttpError::PaginationHeaderMissing`] when either header is
    /// absent, in addition to the [`execute`](Self::execute) taxonomy.
    pub async fn get_page(
        &self,
        path: &str,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<serde_json::Value>, HttpError> {
        self.fetch_page(path, page_number, params, true).await
    }

    /// Fetches one page of a collection whose endpoint reports no
    /// total-count headers.
    ///
    /// Absent headers are tolerated here: `total_pages` falls back to the
    /// requested page number and `total_count` to the item count, so
    /// continuation must be driven by [`Continuation::ItemCount`].
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn get_page_uncounted(
        &self,
        path: &str,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<serde_json::Value>, HttpError> {
        self.fetch_page(path, page_number, params, false).await
    }

    /// Returns a lazy stream of pages for a collection endpoint, using the
    /// total-page-count headers for continuation.
    #[must_use]
    pub fn pages(&self, path: &str, params: ListParams) -> PageStream<serde_json::Value> {
        self.pages_with(path, params, Continuation::TotalPages)
    }

    /// Returns a lazy stream of pages with an explicit continuation mode.
    ///
    /// [`Continuation::ItemCount`] selects the header-free fetch, for the
    /// endpoints that report no total counts.
    #[must_use]
    pub fn pages_with(
        &self,
        path: &str,
        params: ListParams,
        continuation: Continuation,
    ) -> PageStream<serde_json::Value> {
        let client = self.clone();
        let path = path.to_string();
        let require_headers = matches!(continuation, Continuation::TotalPages);

        PageStream::new(continuation, move |page_number| {
            let client = client.clone();
            let path = path.clone();
            let params = params.clone();
            Box::pin(async move {
                client
                    .fetch_page(&path, page_number, &params, require_headers)
                    .await
            })
        })
    }

    /// Sends a GET request and returns the decoded body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path).build()?;
        Ok(self.execute(request).await?.body)
    }

    /// Sends a GET request with query parameters and returns the decoded
    /// body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get_with_params(
        &self,
        path: &str,
        params: HashMap<String, String>,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(params)
            .build()?;
        Ok(self.execute(request).await?.body)
    }

    /// Sends a POST request with a JSON body and returns the decoded body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()?;
        Ok(self.execute(request).await?.body)
    }

    /// Sends a PATCH request with a JSON body and returns the decoded body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Patch, path)
            .body(body)
            .build()?;
        Ok(self.execute(request).await?.body)
    }

    /// Sends a DELETE request and returns the decoded body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        Ok(self.execute(request).await?.body)
    }

    /// Whether the current token is near expiry.
    ///
    /// Errors with [`HttpError::AuthenticationRequired`] when no session
    /// exists, without touching the network.
    async fn near_expiry(&self) -> Result<bool, HttpError> {
        let guard = self.token.lock().await;
        guard
            .as_ref()
            .map(|token| token.is_near_expiry(Utc::now(), self.expiry_skew))
            .ok_or(HttpError::AuthenticationRequired)
    }

    /// Refreshes the session token via the refresh-token grant.
    ///
    /// The token lock is held across the exchange so concurrent refreshes
    /// coalesce into one in-flight grant; the exchange either fully
    /// completes and replaces the whole token, or fails and leaves the
    /// previous state untouched.
    async fn refresh(&self) -> Result<(), HttpError> {
        let mut guard = self.token.lock().await;
        let refresh_token = guard
            .as_ref()
            .map(|token| token.refresh_token.clone())
            .ok_or(HttpError::AuthenticationRequired)?;

        let new_token = oauth::refresh(&self.http, &self.config, &refresh_token)
            .await
            .map_err(HttpError::Auth)?;
        *guard = Some(new_token);
        Ok(())
    }

    /// Performs one HTTP attempt for `request`, reading the token for auth
    /// headers at send time so a retry sees the refreshed credential.
    async fn send(&self, request: &HttpRequest, url: &str) -> Result<HttpResponse, HttpError> {
        let authorization = {
            let guard = self.token.lock().await;
            guard
                .as_ref()
                .map(TokenState::authorization_value)
                .ok_or(HttpError::AuthenticationRequired)?
        };

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), authorization);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
            HttpMethod::Patch => self.http.patch(url),
            HttpMethod::Delete => self.http.delete(url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.method, path = %request.path, "dispatching request");

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        // A non-JSON body is kept verbatim for diagnostics.
        let body = if body_text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::Value::String(body_text))
        };

        Ok(HttpResponse::new(status, res_headers, body))
    }

    async fn fetch_page(
        &self,
        path: &str,
        page_number: u32,
        params: &ListParams,
        require_headers: bool,
    ) -> Result<Page<serde_json::Value>, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path)
            .query_param("page", page_number.to_string());
        if let Some(page_size) = params.page_size {
            builder = builder.query_param("pageSize", page_size.to_string());
        }
        if let Some(columns) = &params.columns {
            builder = builder.query_param("columns", columns.clone());
        }
        for (key, value) in &params.filters {
            builder = builder.query_param(key.clone(), value.clone());
        }
        if let Some(instant) = params.modified_since {
            builder = builder.modified_since(instant);
        }

        let response = self.execute(builder.build()?).await?;

        let (total_pages, total_count) = if require_headers {
            (response.result_pages()?, response.result_total()?)
        } else {
            (
                response.result_pages().unwrap_or(page_number),
                response.result_total().unwrap_or_default(),
            )
        };

        let items: Vec<serde_json::Value> = serde_json::from_value(response.body)?;
        let total_count = if require_headers {
            total_count
        } else {
            // No server-reported total; the item count is the best signal.
            std::cmp::max(total_count, items.len() as u64)
        };

        Ok(Page {
            items,
            page_number,
            total_pages,
            total_count,
        })
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn response_error(response: &HttpResponse) -> HttpResponseError {
        let body = match &response.body {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        HttpResponseError {
            status: response.status,
            body,
        }
    }
}

impl std::fmt::Debug for SimproClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimproClient")
            .field("api_base", &self.api_base)
            .field("proactive_refresh", &self.proactive_refresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseUrl, ClientId, ClientSecret, Company};

    fn create_config() -> SimproConfig {
        SimproConfig::builder()
            .base_url(BaseUrl::new("https://test.simprosuite.com").unwrap())
            .client_id(ClientId::new("test-client-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .company(Company::new("0").unwrap())
            .build()
            .unwrap()
    }

    fn create_token(expires_in: i64) -> TokenState {
        let response = crate::auth::TokenResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "Bearer".to_string(),
            expires_in,
        };
        TokenState::from_response(&response, Utc::now())
    }

    #[test]
    fn test_client_api_base_is_company_scoped() {
        let client = SimproClient::new(create_config());
        assert_eq!(
            client.api_base(),
            "https://test.simprosuite.com/api/v1.0/companies/0"
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_execute_fails_without_network() {
        let client = SimproClient::new(create_config());
        let request = HttpRequest::builder(HttpMethod::Get, "sites/1")
            .build()
            .unwrap();

        let result = client.execute(request).await;
        assert!(matches!(result, Err(HttpError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn test_with_token_establishes_session() {
        let client = SimproClient::with_token(create_config(), create_token(3600));
        let token = client.token().await.unwrap();
        assert_eq!(token.access_token, "access");
    }

    #[tokio::test]
    async fn test_near_expiry_uses_skew() {
        let client = SimproClient::with_token(create_config(), create_token(3));
        assert!(client.near_expiry().await.unwrap());

        let client = SimproClient::with_token(create_config(), create_token(10));
        assert!(!client.near_expiry().await.unwrap());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimproClient>();
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = SimproClient::with_token(create_config(), create_token(3600));
        let debug = format!("{client:?}");
        assert!(!debug.contains("access"));
    }
}
