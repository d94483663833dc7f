//! Error types for SDK configuration.
//!
//! Configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and
//! actionable.
//!
//! # Example
//!
//! ```rust
//! use simpro_api::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// OAuth client id cannot be empty.
    #[error("Client id cannot be empty. Please provide a valid simPRO client id.")]
    EmptyClientId,

    /// OAuth client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide a valid simPRO client secret.")]
    EmptyClientSecret,

    /// The base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an absolute URL with scheme (e.g. 'https://mybuild.simprosuite.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The company identifier is invalid.
    #[error("Invalid company id '{company}'. Expected a non-empty path segment (e.g. '0').")]
    InvalidCompany {
        /// The invalid company id that was provided.
        company: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
