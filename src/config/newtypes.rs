//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// A validated DigitalOcean personal access token.
///
/// The `Debug` implementation masks the value so tokens never end up in logs.
///
/// # Example
///
/// ```rust
/// use digitalocean_api::ApiToken;
///
/// let token = ApiToken::new("dop_v1_abc").unwrap();
/// assert_eq!(token.as_ref(), "dop_v1_abc");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// The public half of a signing key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessKeyId(String);

impl AccessKeyId {
    /// Creates a new validated access key id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessKeyId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyAccessKeyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AccessKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The secret half of a signing key pair.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `SecretKey(*****)`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Creates a new validated secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for SecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(*****)")
    }
}

/// Label identifying the calling application in request signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientLabel(String);

impl ClientLabel {
    /// Creates a new validated client label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientLabel`] if the label is empty.
    pub fn new(label: impl Into<String>) -> Result<Self, ConfigError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ConfigError::EmptyClientLabel);
        }
        Ok(Self(label))
    }
}

impl AsRef<str> for ClientLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated API base endpoint, such as `https://api.digitalocean.com/v2`.
///
/// The endpoint must be an absolute `http` or `https` URL with a host and no
/// query or fragment. Trailing slashes are removed so that resource paths can
/// be joined with exactly one separator.
///
/// # Example
///
/// ```rust
/// use digitalocean_api::BaseEndpoint;
///
/// let endpoint = BaseEndpoint::new("https://api.digitalocean.com/v2/").unwrap();
/// assert_eq!(endpoint.as_ref(), "https://api.digitalocean.com/v2");
/// assert_eq!(endpoint.host_name(), Some("api.digitalocean.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseEndpoint {
    url: Url,
    normalized: String,
}

impl BaseEndpoint {
    /// The public DigitalOcean v2 endpoint.
    pub const DEFAULT: &'static str = "https://api.digitalocean.com/v2";

    /// Creates a new validated base endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseEndpoint`] if the URL cannot be
    /// parsed, has no host, uses a scheme other than `http`/`https`, or
    /// carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let invalid = |reason: String| ConfigError::InvalidBaseEndpoint {
            url: raw.clone(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }

        Ok(Self {
            normalized: trimmed.to_string(),
            url: parsed,
        })
    }

    /// Returns the host name of the endpoint.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }
}

impl Default for BaseEndpoint {
    fn default() -> Self {
        Self {
            url: Url::parse(Self::DEFAULT).unwrap_or_else(|_| unreachable!("default endpoint is valid")),
            normalized: Self::DEFAULT.to_string(),
        }
    }
}

impl AsRef<str> for BaseEndpoint {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for BaseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl Serialize for BaseEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.normalized)
    }
}

impl<'de> Deserialize<'de> for BaseEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_rejects_empty_string() {
        assert!(matches!(ApiToken::new(""), Err(ConfigError::EmptyApiToken)));
        assert!(matches!(ApiToken::new("   "), Err(ConfigError::EmptyApiToken)));
    }

    #[test]
    fn test_secrets_are_masked_in_debug() {
        let token = ApiToken::new("dop_v1_secret").unwrap();
        assert_eq!(format!("{token:?}"), "ApiToken(*****)");

        let secret = SecretKey::new("super-secret-key").unwrap();
        let debug_output = format!("{secret:?}");
        assert_eq!(debug_output, "SecretKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_signing_parts_reject_empty() {
        assert!(matches!(
            AccessKeyId::new(""),
            Err(ConfigError::EmptyAccessKeyId)
        ));
        assert!(matches!(SecretKey::new(""), Err(ConfigError::EmptySecretKey)));
        assert!(matches!(
            ClientLabel::new(" "),
            Err(ConfigError::EmptyClientLabel)
        ));
    }

    #[test]
    fn test_base_endpoint_strips_trailing_slashes() {
        let endpoint = BaseEndpoint::new("https://api.example.com/v2//").unwrap();
        assert_eq!(endpoint.as_ref(), "https://api.example.com/v2");
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host_name(), Some("api.example.com"));
    }

    #[test]
    fn test_base_endpoint_accepts_local_ports() {
        let endpoint = BaseEndpoint::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(endpoint.as_ref(), "http://127.0.0.1:8080");
        assert_eq!(endpoint.host_name(), Some("127.0.0.1"));
    }

    #[test]
    fn test_base_endpoint_rejects_malformed() {
        assert!(BaseEndpoint::new("api.example.com").is_err());
        assert!(BaseEndpoint::new("ftp://api.example.com").is_err());
        assert!(BaseEndpoint::new("https://api.example.com/v2?x=1").is_err());
        assert!(BaseEndpoint::new("").is_err());
    }

    #[test]
    fn test_default_base_endpoint() {
        let endpoint = BaseEndpoint::default();
        assert_eq!(endpoint.as_ref(), BaseEndpoint::DEFAULT);
    }

    #[test]
    fn test_base_endpoint_round_trip_serialization() {
        let original = BaseEndpoint::new("https://api.example.com/v2").unwrap();
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#""https://api.example.com/v2""#);
        let restored: BaseEndpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
