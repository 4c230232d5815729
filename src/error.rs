//! Configuration error types for the DigitalOcean API adapter.
//!
//! Configuration failures are local and never retryable: they are raised
//! while building a [`DigitalOceanConfig`](crate::DigitalOceanConfig) or one
//! of its validated newtypes, before any request can reach the network.
//!
//! # Example
//!
//! ```rust
//! use digitalocean_api::{ApiToken, ConfigError};
//!
//! let result = ApiToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API token cannot be empty.
    #[error("API token cannot be empty. Please provide a valid DigitalOcean API token.")]
    EmptyApiToken,

    /// Access key id cannot be empty.
    #[error("Access key id cannot be empty.")]
    EmptyAccessKeyId,

    /// Secret key cannot be empty.
    #[error("Secret key cannot be empty.")]
    EmptySecretKey,

    /// Client label cannot be empty.
    #[error("Client label cannot be empty.")]
    EmptyClientLabel,

    /// The base endpoint could not be parsed or uses an unsupported scheme.
    #[error("Invalid base endpoint '{url}': {reason}")]
    InvalidBaseEndpoint {
        /// The endpoint that was provided.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric setting is outside its accepted range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidSetting {
        /// The name of the setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
