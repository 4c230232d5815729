//! Configuration types for the DigitalOcean API adapter.
//!
//! This module provides the configuration used to build every client in the
//! crate. Configuration is instance-based: there is no global state, and two
//! clients with different credentials can run side by side.
//!
//! # Overview
//!
//! - [`DigitalOceanConfig`]: The main configuration struct
//! - [`DigitalOceanConfigBuilder`]: A builder for constructing [`DigitalOceanConfig`] instances
//! - [`ApiToken`]: A validated bearer token with masked debug output
//! - [`AccessKeyId`], [`SecretKey`], [`ClientLabel`]: Parts of a signing key
//! - [`BaseEndpoint`]: The validated API root URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use digitalocean_api::{ApiToken, Credentials, DigitalOceanConfig};
//!
//! let config = DigitalOceanConfig::builder()
//!     .credentials(Credentials::bearer(ApiToken::new("dop_v1_abc").unwrap()))
//!     .poll_interval(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 1000);
//! ```

mod newtypes;

pub use newtypes::{AccessKeyId, ApiToken, BaseEndpoint, ClientLabel, SecretKey};

use std::time::Duration;

use crate::auth::Credentials;
use crate::error::ConfigError;

/// Default connection time-out.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default per-request time-out.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default `per_page` value sent with listings.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Default bound on concurrently running page requests.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 16;

/// Default pause between two checks of a droplet's action history.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Default wall-clock budget of the completion poller.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for the DigitalOcean API adapter.
///
/// # Thread Safety
///
/// `DigitalOceanConfig` is `Clone`, `Send`, and `Sync`, making it safe to
/// share across threads and async tasks.
#[derive(Clone, Debug)]
pub struct DigitalOceanConfig {
    base_endpoint: BaseEndpoint,
    credentials: Credentials,
    user_agent_prefix: Option<String>,
    connect_timeout: Duration,
    request_timeout: Duration,
    page_size: u32,
    max_concurrent_requests: usize,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl DigitalOceanConfig {
    /// Creates a new builder for constructing a `DigitalOceanConfig`.
    #[must_use]
    pub fn builder() -> DigitalOceanConfigBuilder {
        DigitalOceanConfigBuilder::new()
    }

    /// Returns the API root URL.
    #[must_use]
    pub const fn base_endpoint(&self) -> &BaseEndpoint {
        &self.base_endpoint
    }

    /// Returns the credentials attached to every request.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the connection time-out.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the per-request time-out.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the `per_page` value sent with listings.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the bound on concurrently running page requests.
    #[must_use]
    pub const fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Returns the pause between two poller checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the poller's wall-clock budget.
    #[must_use]
    pub const fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }
}

// Verify DigitalOceanConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DigitalOceanConfig>();
};

/// Builder for constructing [`DigitalOceanConfig`] instances.
///
/// `credentials` is the only required field.
///
/// # Defaults
///
/// - `base_endpoint`: `https://api.digitalocean.com/v2`
/// - `connect_timeout`: 10 seconds
/// - `request_timeout`: 5 minutes
/// - `page_size`: 1000
/// - `max_concurrent_requests`: 16
/// - `poll_interval`: 15 seconds
/// - `poll_timeout`: 10 minutes
///
/// # Example
///
/// ```rust
/// use digitalocean_api::{
///     AccessKeyId, BaseEndpoint, ClientLabel, Credentials, DigitalOceanConfig, SecretKey,
/// };
///
/// let config = DigitalOceanConfig::builder()
///     .base_endpoint(BaseEndpoint::new("https://do.internal.example/v2").unwrap())
///     .credentials(Credentials::signed(
///         AccessKeyId::new("AKID").unwrap(),
///         SecretKey::new("secret").unwrap(),
///         ClientLabel::new("fleet-manager").unwrap(),
///     ))
///     .user_agent_prefix("FleetManager/2.1")
///     .max_concurrent_requests(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct DigitalOceanConfigBuilder {
    base_endpoint: Option<BaseEndpoint>,
    credentials: Option<Credentials>,
    user_agent_prefix: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    page_size: Option<u32>,
    max_concurrent_requests: Option<usize>,
    poll_interval: Option<Duration>,
    poll_timeout: Option<Duration>,
}

impl DigitalOceanConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root URL.
    #[must_use]
    pub fn base_endpoint(mut self, endpoint: BaseEndpoint) -> Self {
        self.base_endpoint = Some(endpoint);
        self
    }

    /// Sets the credentials (required).
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection time-out.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the per-request time-out.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the `per_page` value sent with listings.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sets the bound on concurrently running page requests.
    #[must_use]
    pub const fn max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = Some(limit);
        self
    }

    /// Sets the pause between two poller checks.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets the poller's wall-clock budget.
    #[must_use]
    pub const fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    /// Builds the [`DigitalOceanConfig`], validating required fields and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `credentials` is not
    /// set, and [`ConfigError::InvalidSetting`] if `page_size`,
    /// `max_concurrent_requests`, `poll_interval` or a time-out is zero.
    pub fn build(self) -> Result<DigitalOceanConfig, ConfigError> {
        let credentials = self
            .credentials
            .ok_or(ConfigError::MissingRequiredField {
                field: "credentials",
            })?;

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "page_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        let max_concurrent_requests = self
            .max_concurrent_requests
            .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);
        if max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "max_concurrent_requests",
                reason: "must be greater than zero".to_string(),
            });
        }

        let connect_timeout = non_zero(
            "connect_timeout",
            self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        )?;
        let request_timeout = non_zero(
            "request_timeout",
            self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        )?;
        let poll_interval = non_zero(
            "poll_interval",
            self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        )?;
        let poll_timeout = non_zero(
            "poll_timeout",
            self.poll_timeout.unwrap_or(DEFAULT_POLL_TIMEOUT),
        )?;

        Ok(DigitalOceanConfig {
            base_endpoint: self.base_endpoint.unwrap_or_default(),
            credentials,
            user_agent_prefix: self.user_agent_prefix,
            connect_timeout,
            request_timeout,
            page_size,
            max_concurrent_requests,
            poll_interval,
            poll_timeout,
        })
    }
}

fn non_zero(field: &'static str, value: Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::InvalidSetting {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer() -> Credentials {
        Credentials::bearer(ApiToken::new("token").unwrap())
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = DigitalOceanConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "credentials"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = DigitalOceanConfig::builder()
            .credentials(bearer())
            .build()
            .unwrap();

        assert_eq!(config.base_endpoint().as_ref(), BaseEndpoint::DEFAULT);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
        assert_eq!(config.page_size(), 1000);
        assert_eq!(config.max_concurrent_requests(), 16);
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
        assert_eq!(config.poll_timeout(), Duration::from_secs(600));
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_page_size() {
        let result = DigitalOceanConfig::builder()
            .credentials(bearer())
            .page_size(0)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting {
                field: "page_size",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_concurrency() {
        let result = DigitalOceanConfig::builder()
            .credentials(bearer())
            .max_concurrent_requests(0)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting {
                field: "max_concurrent_requests",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = DigitalOceanConfig::builder()
            .credentials(bearer())
            .connect_timeout(Duration::ZERO)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting {
                field: "connect_timeout",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_poll_interval() {
        let result = DigitalOceanConfig::builder()
            .credentials(bearer())
            .poll_interval(Duration::ZERO)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting {
                field: "poll_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_poll_timeout() {
        let result = DigitalOceanConfig::builder()
            .credentials(bearer())
            .poll_timeout(Duration::ZERO)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting {
                field: "poll_timeout",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let endpoint = BaseEndpoint::new("http://localhost:8080/v2").unwrap();
        let config = DigitalOceanConfig::builder()
            .base_endpoint(endpoint.clone())
            .credentials(bearer())
            .user_agent_prefix("MyApp/1.0")
            .connect_timeout(Duration::from_secs(2))
            .request_timeout(Duration::from_secs(30))
            .page_size(50)
            .max_concurrent_requests(2)
            .poll_interval(Duration::from_millis(100))
            .poll_timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        assert_eq!(config.base_endpoint(), &endpoint);
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.max_concurrent_requests(), 2);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_config_debug_masks_token() {
        let config = DigitalOceanConfig::builder()
            .credentials(Credentials::bearer(ApiToken::new("super-secret").unwrap()))
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("DigitalOceanConfig"));
        assert!(!debug_str.contains("super-secret"));
    }
}
