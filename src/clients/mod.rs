//! HTTP client types for DigitalOcean API communication.
//!
//! This module provides the transport layer: request targets, authenticated
//! HTTP exchanges with retry handling, pagination parsing and the
//! asynchronous page pipeline.
//!
//! # Overview
//!
//! - [`RequestTarget`]: Resource path template, identifier and query
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`PaginationInfo`]: Continuation metadata of one page
//! - [`Transport`]: Spawns one task per page and hands back a [`ResponseHandle`]
//!
//! # Retry Behavior
//!
//! The client implements automatic retry logic for transient failures:
//!
//! - **429 (Rate Limited)**: Retries using `Retry-After` header value, or 1 second if not present
//! - **5xx (Server Error)**: Retries with fixed 1-second delay
//! - **Other errors (4xx)**: Returns immediately without retry
//!
//! The default `tries` is 1, meaning no automatic retries. Configure via
//! [`HttpRequest::builder`] with `.tries(n)` to enable retries.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod target;
mod transport;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{
    HttpResponse, PaginationInfo, LAST_PAGE_HEADER, PAGE_PARAM, PAGINATION_ID_HEADER,
    PAGINATION_ID_PARAM,
};
pub use target::{RequestTarget, ID_PLACEHOLDER};
pub use transport::{ResponseHandle, Transport, PER_PAGE_PARAM};

