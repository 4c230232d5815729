//! HTTP request types for the DigitalOcean API adapter.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests against a [`RequestTarget`].

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::target::RequestTarget;

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and triggering actions.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for methods that carry a JSON body.
    #[must_use]
    pub const fn takes_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Status codes that indicate success for a mutating call with this method.
    ///
    /// Creation expects 201/202, update expects 202 and deletion expects 204.
    #[must_use]
    pub const fn expected_success_codes(&self) -> &'static [u16] {
        match self {
            Self::Get => &[200],
            Self::Post => &[201, 202],
            Self::Put => &[202],
            Self::Delete => &[204],
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request to be sent to the API.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use digitalocean_api::clients::{HttpMethod, HttpRequest, RequestTarget};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, RequestTarget::new("droplets"))
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(
///         HttpMethod::Post,
///         RequestTarget::new("droplets/{id}/actions").with_identifier("42"),
///     )
///     .body(json!({"type": "power_on"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Where the request is sent.
    pub target: RequestTarget,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Number of times to attempt the request (default: 1).
    pub tries: u32,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, target: RequestTarget) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, target)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    /// - `http_method` is `Get` or `Delete` but `body` is `Some`
    /// - the target path cannot be resolved
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.http_method.takes_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        if !self.http_method.takes_body() && self.body.is_some() {
            return Err(InvalidHttpRequestError::UnexpectedBody {
                method: self.http_method.to_string(),
            });
        }

        self.target.resolved_path().map(|_| ())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    target: RequestTarget,
    body: Option<serde_json::Value>,
    extra_headers: Option<HashMap<String, String>>,
    tries: u32,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, target: RequestTarget) -> Self {
        Self {
            http_method: method,
            target,
            body: None,
            extra_headers: None,
            tries: 1,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the number of times to attempt the request.
    ///
    /// Default is 1 (no retries). Set to a higher value to enable
    /// automatic retries for 429 and 5xx responses.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            target: self.target,
            body: self.body,
            extra_headers: self.extra_headers,
            tries: self.tries.max(1),
        };
        request.verify()?;
        Ok(request)
    }
}
