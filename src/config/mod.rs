//! Configuration types for the simPRO API client.
//!
//! # Overview
//!
//! - [`SimproConfig`]: the main configuration struct holding credentials and
//!   connection settings
//! - [`SimproConfigBuilder`]: builder for constructing [`SimproConfig`]
//! - [`ClientId`] / [`ClientSecret`]: validated OAuth credentials
//! - [`BaseUrl`] / [`Company`]: validated connection values
//!
//! # Example
//!
//! ```rust
//! use simpro_api::{SimproConfig, ClientId, ClientSecret, BaseUrl, Company};
//!
//! let config = SimproConfig::builder()
//!     .base_url(BaseUrl::new("https://mybuild.simprosuite.com").unwrap())
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .company(Company::new("0").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, ClientId, ClientSecret, Company};

use crate::error::ConfigError;

/// Path suffix of the OAuth2 token endpoint, relative to the base URL.
pub(crate) const TOKEN_URL_SUFFIX: &str = "oauth2/token";

/// Path suffix of the versioned API root, relative to the base URL.
pub(crate) const API_URL_SUFFIX: &str = "api/v1.0";

/// Configuration for the simPRO API client.
///
/// Holds the OAuth credentials and connection settings for one simPRO
/// build. `SimproConfig` is `Clone`, `Send`, and `Sync`, so it can be
/// shared across async tasks.
#[derive(Clone, Debug)]
pub struct SimproConfig {
    base_url: BaseUrl,
    client_id: ClientId,
    client_secret: ClientSecret,
    company: Company,
}

impl SimproConfig {
    /// Creates a new builder for constructing a `SimproConfig`.
    #[must_use]
    pub fn builder() -> SimproConfigBuilder {
        SimproConfigBuilder::new()
    }

    /// Returns the base URL of the simPRO build.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the OAuth client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the company id.
    #[must_use]
    pub const fn company(&self) -> &Company {
        &self.company
    }

    /// Returns the full URL of the OAuth2 token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/{TOKEN_URL_SUFFIX}", self.base_url.as_ref())
    }

    /// Returns the company-scoped API root all resource paths hang off.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!(
            "{}/{API_URL_SUFFIX}/companies/{}",
            self.base_url.as_ref(),
            self.company.as_ref()
        )
    }
}

// Verify SimproConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SimproConfig>();
};

/// Builder for constructing [`SimproConfig`] instances.
#[derive(Debug, Default)]
pub struct SimproConfigBuilder {
    base_url: Option<BaseUrl>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    company: Option<Company>,
}

impl SimproConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the simPRO build.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the OAuth client id.
    #[must_use]
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Sets the OAuth client secret.
    #[must_use]
    pub fn client_secret(mut self, client_secret: ClientSecret) -> Self {
        self.client_secret = Some(client_secret);
        self
    }

    /// Sets the company id.
    #[must_use]
    pub fn company(mut self, company: Company) -> Self {
        self.company = Some(company);
        self
    }

    /// Builds the [`SimproConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if any required field
    /// has not been set.
    pub fn build(self) -> Result<SimproConfig, ConfigError> {
        Ok(SimproConfig {
            base_url: self
                .base_url
                .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?,
            client_id: self
                .client_id
                .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?,
            client_secret: self.client_secret.ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?,
            company: self
                .company
                .ok_or(ConfigError::MissingRequiredField { field: "company" })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_config() -> SimproConfig {
        SimproConfig::builder()
            .base_url(BaseUrl::new("https://test.simprosuite.com").unwrap())
            .client_id(ClientId::new("test-client-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .company(Company::new("0").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_all_fields() {
        let result = SimproConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_token_url_construction() {
        let config = create_config();
        assert_eq!(
            config.token_url(),
            "https://test.simprosuite.com/oauth2/token"
        );
    }

    #[test]
    fn test_api_base_url_is_company_scoped() {
        let config = create_config();
        assert_eq!(
            config.api_base_url(),
            "https://test.simprosuite.com/api/v1.0/companies/0"
        );
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimproConfig>();
    }
}
