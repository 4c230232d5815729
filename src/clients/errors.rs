//! HTTP-specific error types for the DigitalOcean API adapter.
//!
//! This module contains error types for the transport layer:
//!
//! - [`HttpResponseError`]: A non-success HTTP response (status, reason, body)
//! - [`MaxHttpRetriesExceededError`]: When retry attempts are exhausted
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! Every type here is `Clone`: a failed page is published once by the task
//! that performed the request and may then be read by any number of handle
//! holders.
//!
//! # Example
//!
//! ```rust,ignore
//! use digitalocean_api::clients::HttpError;
//!
//! match handle.json().await {
//!     Ok(body) => println!("Body: {body:?}"),
//!     Err(HttpError::Response(e)) => println!("API error {} {}: {}", e.code, e.reason, e.body),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code} {reason}: {body}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The canonical reason phrase for the status code.
    pub reason: String,
    /// The raw response body.
    pub body: String,
    /// Reference ID for error reporting (from the `x-request-id` header).
    pub error_reference: Option<String>,
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Exceeded maximum retry count of {tries}. Last response: HTTP {code}: {body}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// The body of the last response.
    pub body: String,
    /// Reference ID for error reporting (from the `x-request-id` header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before it is sent.
///
/// These are local failures; nothing reaches the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET or DELETE request was given a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that does not take a body.
        method: String,
    },

    /// The resource path is empty.
    #[error("Resource path cannot be empty.")]
    EmptyPath,

    /// The path template requires an identifier that was not supplied.
    #[error("Resource path '{template}' requires an identifier.")]
    MissingIdentifier {
        /// The template that contains the placeholder.
        template: String,
    },

    /// The joined URL failed to parse.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The parser's explanation.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error, Clone)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error (refused, reset, timed out).
    #[error("Network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The response could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(Arc::new(error))
    }
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) | Self::Malformed(_) => None,
        }
    }

    /// Returns `true` when the underlying cause was a time-out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}
