//! Resource-level error types.
//!
//! These errors surface to callers of the registry, the transport handles and
//! the action executor. Transport failures are captured inside the response
//! handle and re-surfaced here when the handle is read.
//!
//! # Error Handling
//!
//! - **404**: [`ResourceError::NotFound`] - the resource does not exist
//! - **Other non-2xx**: [`ResourceError::Provider`] - status, reason and body
//! - **Embedded `id` + `message` body**: [`ResourceError::Provider`], whatever the status
//! - **Missing action parameter**: [`ResourceError::Validation`], raised before any request
//! - **I/O failures**: [`ResourceError::Http`]
//!
//! # Example
//!
//! ```rust,ignore
//! use digitalocean_api::rest::{ResourceError, ResourceKind};
//!
//! match client.get(ResourceKind::Droplet, "42").await {
//!     Ok(Some(droplet)) => println!("{droplet:?}"),
//!     Ok(None) => println!("gone"),
//!     Err(ResourceError::Provider(e)) => println!("{} {}: {}", e.status.unwrap_or(0), e.reason, e.message),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::error::ConfigError;
use crate::rest::registry::ResourceKind;

/// An error reported by the provider.
///
/// Raised for non-success statuses other than 404 and for 2xx bodies that
/// carry the provider's `{"id": ..., "message": ...}` error shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status, when the error came with one.
    pub status: Option<u16>,
    /// Reason phrase or the provider's error id.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Raw response body for diagnosis.
    pub body: String,
}

impl ProviderError {
    /// Builds an error from the embedded error shape of `body`, if present.
    ///
    /// The shape is a top-level object carrying both an `id` and a `message`.
    #[must_use]
    pub fn from_embedded(status: Option<u16>, body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let id = object.get("id")?;
        let message = object.get("message")?;

        let text = |v: &Value| v.as_str().map_or_else(|| v.to_string(), str::to_string);

        Some(Self {
            status,
            reason: text(id),
            message: text(message),
            body: body.to_string(),
        })
    }
}

impl From<HttpResponseError> for ProviderError {
    fn from(error: HttpResponseError) -> Self {
        let message = serde_json::from_str::<Value>(&error.body)
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {} {}", error.code, error.reason));

        Self {
            status: Some(error.code),
            reason: error.reason,
            message,
            body: error.body,
        }
    }
}

/// A local validation failure. Nothing reaches the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A parameter the action requires is absent or null.
    #[error("{action}: missing required parameter '{field}'")]
    MissingParameter {
        /// Description of the action being validated.
        action: String,
        /// The missing parameter.
        field: String,
    },
}

/// Error type for resource operations.
#[derive(Debug, Error, Clone)]
pub enum ResourceError {
    /// The resource was not found (HTTP 404).
    #[error("{kind} {} not found", id.as_deref().unwrap_or("listing"))]
    NotFound {
        /// The kind that was requested.
        kind: ResourceKind,
        /// The identifier that was requested, if any.
        id: Option<String>,
    },

    /// A required action parameter is missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider reported a failure.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The body did not have the expected envelope shape.
    #[error("Cannot parse {kind} envelope: {reason}")]
    Parse {
        /// The kind being decoded.
        kind: ResourceKind,
        /// What was wrong with the body.
        reason: String,
    },

    /// Transport-level failure (network, retries exhausted, malformed response).
    #[error(transparent)]
    Http(HttpError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl From<HttpError> for ResourceError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Response(e) => Self::Provider(e.into()),
            HttpError::InvalidRequest(e) => Self::InvalidRequest(e),
            other => Self::Http(other),
        }
    }
}

impl ResourceError {
    /// Returns `true` for [`ResourceError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Provider(e) => e.status,
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}
