//! Authentication types for the simPRO API client.
//!
//! # Overview
//!
//! - [`TokenState`]: the current bearer credential and its expiry instant
//! - [`TokenResponse`]: the wire form returned by the token endpoint
//! - [`oauth`]: the `password` and `refresh_token` grant exchanges
//! - [`AuthError`]: token-endpoint failures, including [`AuthError::LogonFailure`]
//!
//! A session that has never completed a login exchange holds no
//! [`TokenState`] at all; that "unauthenticated" state is distinct from
//! "token present but expired" and fails before any network call is made.

pub mod oauth;
pub mod token;

pub use oauth::AuthError;
pub use token::{TokenResponse, TokenState, DEFAULT_EXPIRY_SKEW};
