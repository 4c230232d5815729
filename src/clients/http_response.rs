//! HTTP response types for the DigitalOcean API adapter.
//!
//! This module provides the [`HttpResponse`] type and the pagination
//! metadata parsed from it.

use std::collections::HashMap;

use serde_json::Value;
use url::Url;

use crate::clients::target::RequestTarget;

/// Header carrying the continuation token of a paginated listing.
pub const PAGINATION_ID_HEADER: &str = "x-pagination-id";

/// Header that is `"true"` on the final page of a listing.
pub const LAST_PAGE_HEADER: &str = "x-last-page";

/// Query parameter used to send the continuation token back.
pub const PAGINATION_ID_PARAM: &str = "paginationId";

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Pagination metadata for one page.
///
/// Two signals are understood. The header pair
/// ([`PAGINATION_ID_HEADER`], [`LAST_PAGE_HEADER`]) takes precedence; when the
/// last-page header is absent, a `links.pages.next` URL in the body is used
/// instead and its `page` query value becomes the continuation token.
///
/// # Example
///
/// ```rust
/// use digitalocean_api::clients::PaginationInfo;
///
/// let info = PaginationInfo {
///     pagination_id: Some("T1".to_string()),
///     last_page: Some(false),
///     next_page: None,
/// };
/// assert!(info.has_more());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Continuation token from [`PAGINATION_ID_HEADER`].
    pub pagination_id: Option<String>,
    /// Parsed [`LAST_PAGE_HEADER`] value.
    pub last_page: Option<bool>,
    /// Page number extracted from the body's `links.pages.next` URL.
    pub next_page: Option<String>,
}

impl PaginationInfo {
    /// Parses pagination metadata from lower-cased headers and the JSON body.
    #[must_use]
    pub fn from_parts(headers: &HashMap<String, Vec<String>>, body: Option<&Value>) -> Self {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let last_page = first(LAST_PAGE_HEADER).and_then(|v| match v.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        });

        let next_page = body
            .and_then(|b| b.pointer("/links/pages/next"))
            .and_then(Value::as_str)
            .and_then(Self::extract_page);

        Self {
            pagination_id: first(PAGINATION_ID_HEADER),
            last_page,
            next_page,
        }
    }

    fn extract_page(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == PAGE_PARAM)
            .map(|(_, value)| value.into_owned())
    }

    /// Returns `true` when a further page must be requested.
    #[must_use]
    pub fn has_more(&self) -> bool {
        match self.last_page {
            Some(true) => false,
            Some(false) => self.pagination_id.is_some() || self.next_page.is_some(),
            None => self.next_page.is_some(),
        }
    }

    /// Builds the target for the following page.
    ///
    /// Caller-supplied parameters are kept; the continuation parameters replace
    /// any previous values. Returns `None` when this is the last page.
    #[must_use]
    pub fn next_target(&self, current: &RequestTarget, current_page: u32) -> Option<RequestTarget> {
        if !self.has_more() {
            return None;
        }

        let mut next = current.clone();
        if let (Some(false), Some(token)) = (self.last_page, &self.pagination_id) {
            next.set_query_param(PAGINATION_ID_PARAM, token.clone());
            next.set_query_param(PAGE_PARAM, (current_page + 1).to_string());
        } else if let Some(page) = &self.next_page {
            next.set_query_param(PAGE_PARAM, page.clone());
        }
        Some(next)
    }
}

/// An HTTP response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The canonical reason phrase.
    pub reason: String,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub raw: Vec<u8>,
    /// The parsed JSON body, when the raw body is valid JSON.
    pub body: Option<Value>,
    /// Pagination metadata.
    pub pagination: PaginationInfo,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the body and known headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, raw: Vec<u8>) -> Self {
        let body = if raw.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice(&raw).ok()
        };

        let pagination = PaginationInfo::from_parts(&headers, body.as_ref());

        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        let reason = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            code,
            reason,
            headers,
            raw,
            body,
            pagination,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the raw body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }

    /// Returns the `x-request-id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
