//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so an invalid
//! credential or URL is rejected before any request is attempted.

use std::fmt;

use crate::error::ConfigError;

/// A validated OAuth client id.
///
/// # Example
///
/// ```rust
/// use simpro_api::ClientId;
///
/// let id = ClientId::new("my-client-id").unwrap();
/// assert_eq!(id.as_ref(), "my-client-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated OAuth client secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)`, so it cannot leak into logs.
///
/// # Example
///
/// ```rust
/// use simpro_api::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientSecret(*****)")
    }
}

/// A validated simPRO build base URL.
///
/// Must be an absolute `http` or `https` URL. A trailing slash is stripped
/// so paths can be joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use simpro_api::BaseUrl;
///
/// let url = BaseUrl::new("https://mybuild.simprosuite.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://mybuild.simprosuite.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not start
    /// with `http://` or `https://`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ConfigError::InvalidBaseUrl { url });
        }
        Ok(Self(url.trim_end_matches('/').to_string()))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated company identifier.
///
/// simPRO scopes every resource path under `companies/{company}`; the
/// company id must be a single non-empty path segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Company(String);

impl Company {
    /// Creates a new validated company id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCompany`] if the id is empty or
    /// contains a path separator.
    pub fn new(company: impl Into<String>) -> Result<Self, ConfigError> {
        let company = company.into();
        if company.is_empty() || company.contains('/') {
            return Err(ConfigError::InvalidCompany { company });
        }
        Ok(Self(company))
    }
}

impl AsRef<str> for Company {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_rejects_empty() {
        assert!(matches!(ClientId::new(""), Err(ConfigError::EmptyClientId)));
    }

    #[test]
    fn test_client_secret_debug_is_masked() {
        let secret = ClientSecret::new("super-secret").unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "ClientSecret(*****)");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("https://example.simprosuite.com/").unwrap();
        assert_eq!(url.as_ref(), "https://example.simprosuite.com");
    }

    #[test]
    fn test_base_url_rejects_missing_scheme() {
        assert!(matches!(
            BaseUrl::new("example.simprosuite.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_company_rejects_empty_and_slash() {
        assert!(matches!(
            Company::new(""),
            Err(ConfigError::InvalidCompany { .. })
        ));
        assert!(matches!(
            Company::new("0/1"),
            Err(ConfigError::InvalidCompany { .. })
        ));
    }

    #[test]
    fn test_company_accepts_numeric_segment() {
        let company = Company::new("0").unwrap();
        assert_eq!(company.as_ref(), "0");
    }
}
