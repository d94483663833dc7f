//! # simPRO API Rust client
//!
//! A Rust client for the simPRO REST API, providing OAuth2 session
//! handling, transparent token refresh, lazy pagination, read-through
//! collection caching, and reconstruction of nested resource trees.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`SimproConfig`] and its builder
//! - OAuth2 `password` and `refresh_token` grants with a distinct
//!   [`AuthError::LogonFailure`] for rejected credentials
//! - [`SimproClient`]: an authenticated request executor that injects
//!   bearer auth headers and retries exactly once after refreshing an
//!   expired token
//! - [`PageStream`]: lazy, page-at-a-time iteration driven by the
//!   `Result-Pages`/`Result-Total` response headers, or by returned item
//!   counts for endpoints without them
//! - [`ResourceCache`] / [`KeyedCache`]: read-through caches that
//!   materialize a collection once and support in-place append after a
//!   create
//! - [`to_tree`]: rebuilding parent-linked flat records into a forest
//! - Thin endpoint wrappers for invoices, sites, prebuilds, catalogs,
//!   quotes, and leads
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//! use simpro_api::{
//!     BaseUrl, ClientId, ClientSecret, Company, ListParams, SimproClient, SimproConfig,
//! };
//!
//! let config = SimproConfig::builder()
//!     .base_url(BaseUrl::new("https://mybuild.simprosuite.com")?)
//!     .client_id(ClientId::new("client-id")?)
//!     .client_secret(ClientSecret::new("client-secret")?)
//!     .company(Company::new("0")?)
//!     .build()?;
//!
//! let client = SimproClient::new(config);
//! client.login("user", "password").await?;
//!
//! let mut pages = client.invoice_pages(ListParams::new().page_size(250));
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     println!("page {}/{}: {} invoices", page.page_number, page.total_pages, page.items.len());
//! }
//! ```
//!
//! ## Caching and trees
//!
//! ```rust,ignore
//! use simpro_api::{ListParams, ResourceCache, to_tree};
//!
//! let loader_client = client.clone();
//! let groups = ResourceCache::new(move || {
//!     let client = loader_client.clone();
//!     async move {
//!         client
//!             .prebuild_group_pages(ListParams::new().page_size(250))
//!             .drain()
//!             .await
//!     }
//! });
//!
//! let forest = to_tree(&groups.items().await?);
//! ```
//!
//! ## Design principles
//!
//! - **No global state**: configuration and session state are owned by
//!   the client instance; one authenticated session per instance
//! - **Whole-value token replacement**: refresh either fully replaces the
//!   token state or leaves it untouched, never a partial write
//! - **Fail loud**: missing pagination headers, rejected logons, and
//!   non-2xx responses all surface as distinct errors; the only silent
//!   policies are the tree builder's orphan drop and the cache's
//!   no-eviction rule, both documented
//! - **Async-first**: designed for the Tokio runtime; streams and caches
//!   are safe to share across tasks

pub mod api;
pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod tree;

// Re-export public types at crate root for convenience
pub use api::{NewStandardPrice, StandardPriceUpdate};
pub use auth::{AuthError, TokenResponse, TokenState, DEFAULT_EXPIRY_SKEW};
pub use cache::{KeyedCache, ResourceCache};
pub use clients::{
    Continuation, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, ListParams, Page, PageStream, SimproClient,
};
pub use config::{BaseUrl, ClientId, ClientSecret, Company, SimproConfig, SimproConfigBuilder};
pub use error::ConfigError;
pub use tree::to_tree;
