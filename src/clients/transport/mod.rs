//! Paginated asynchronous transport.
//!
//! [`Transport`] turns a resource kind, identifier and query into a request,
//! dispatches it on its own tokio task and returns a [`ResponseHandle`]
//! immediately. A semaphore bounds how many page requests run at once.
//!
//! # Pagination
//!
//! When a GET page reports that more pages follow, the task that received
//! it dispatches the next page and attaches the new handle to the current
//! one before publishing. Page N+1 is therefore never requested before
//! page N has been received and found incomplete, and a reader that sees
//! page N always sees its successor.
//!
//! # Example
//!
//! ```rust,ignore
//! use digitalocean_api::clients::Transport;
//! use digitalocean_api::rest::ResourceKind;
//!
//! let transport = Transport::new(&config)?;
//! let handle = transport.fetch(ResourceKind::Droplets, None, &[("tag_name", "web")])?;
//! let droplets = handle.collect().await?;
//! ```

mod handle;

pub use handle::ResponseHandle;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::target::RequestTarget;
use crate::config::DigitalOceanConfig;
use crate::rest::registry::ResourceKind;
use crate::rest::resources::Entity;
use crate::rest::ResourceError;

use handle::{HandleWriter, Page, Resolution};

/// Query parameter carrying the page size.
pub const PER_PAGE_PARAM: &str = "per_page";

#[derive(Debug)]
struct Inner {
    http: HttpClient,
    permits: Semaphore,
    page_size: u32,
}

/// Dispatches requests and links paginated responses.
///
/// Cloning is cheap; clones share the HTTP client and the concurrency bound.
///
/// All dispatching methods spawn tokio tasks and must be called from within
/// a tokio runtime.
#[derive(Clone, Debug)]
pub struct Transport {
    inner: Arc<Inner>,
}

// Verify Transport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Transport>();
};

impl Transport {
    /// Creates a transport from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be created.
    pub fn new(config: &DigitalOceanConfig) -> Result<Self, HttpError> {
        Ok(Self {
            inner: Arc::new(Inner {
                http: HttpClient::new(config)?,
                permits: Semaphore::new(config.max_concurrent_requests()),
                page_size: config.page_size(),
            }),
        })
    }

    /// Starts fetching `kind` and returns a handle to the first page.
    ///
    /// Collection kinds are requested with the configured page size unless
    /// `query` sets `per_page` itself.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`] without touching the network
    /// if the target cannot be built, e.g. a singular kind without an
    /// identifier.
    pub fn fetch(
        &self,
        kind: ResourceKind,
        identifier: Option<&str>,
        query: &[(&str, &str)],
    ) -> Result<ResponseHandle, ResourceError> {
        let mut target = RequestTarget::new(kind.template()).with_optional_identifier(identifier);
        if kind.is_collection() {
            target.set_query_param(PER_PAGE_PARAM, self.inner.page_size.to_string());
        }
        let target = target.with_query(query.iter().copied());

        let request = HttpRequest::builder(HttpMethod::Get, target).build()?;
        Ok(spawn_page(
            Arc::clone(&self.inner),
            request,
            Some(kind),
            identifier.map(str::to_string),
            1,
        ))
    }

    /// Dispatches an arbitrary request and returns its handle.
    ///
    /// Invalid requests resolve the handle with
    /// [`HttpError::InvalidRequest`] without reaching the network.
    #[must_use]
    pub fn submit(&self, request: HttpRequest) -> ResponseHandle {
        spawn_page(Arc::clone(&self.inner), request, None, None, 1)
    }

    /// Fetches every element of a collection kind, following pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] on 404 and the first transport,
    /// provider or parse error met along the page chain otherwise.
    pub async fn list(
        &self,
        kind: ResourceKind,
        identifier: Option<&str>,
        query: &[(&str, &str)],
    ) -> Result<Vec<Entity>, ResourceError> {
        self.fetch(kind, identifier, query)?.collect().await
    }

    /// Fetches one object of a singular kind.
    ///
    /// Returns `Ok(None)` when the provider answers 404.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] for transport, provider or parse failures.
    pub async fn get(
        &self,
        kind: ResourceKind,
        identifier: &str,
    ) -> Result<Option<Entity>, ResourceError> {
        let decoded = self.fetch(kind, Some(identifier), &[])?.decode().await?;
        Ok(decoded.and_then(|d| d.into_single()))
    }
}

fn spawn_page(
    inner: Arc<Inner>,
    request: HttpRequest,
    kind: Option<ResourceKind>,
    identifier: Option<String>,
    page: u32,
) -> ResponseHandle {
    let (writer, handle) = ResponseHandle::channel(kind, identifier.clone());
    tokio::spawn(run_page(inner, request, kind, identifier, page, writer));
    handle
}

async fn run_page(
    inner: Arc<Inner>,
    request: HttpRequest,
    kind: Option<ResourceKind>,
    identifier: Option<String>,
    page: u32,
    writer: HandleWriter,
) {
    let result = {
        let Ok(_permit) = inner.permits.acquire().await else {
            writer.publish(Resolution::Failed(HttpError::Malformed(
                "transport is shut down".to_string(),
            )));
            return;
        };
        inner.http.request(&request).await
    };

    let resolution = match result {
        Ok(response) => {
            let next = if request.http_method == HttpMethod::Get {
                response
                    .pagination
                    .next_target(&request.target, page)
                    .map(|target| {
                        debug!(
                            kind = kind.map_or("-", ResourceKind::as_str),
                            page = page + 1,
                            "requesting next page"
                        );
                        let next_request = HttpRequest {
                            target,
                            ..request.clone()
                        };
                        spawn_page(
                            Arc::clone(&inner),
                            next_request,
                            kind,
                            identifier.clone(),
                            page + 1,
                        )
                    })
            } else {
                None
            };
            Resolution::Page(Page { response, next })
        }
        Err(HttpError::Response(e)) if e.code == 404 => {
            debug!(
                kind = kind.map_or("-", ResourceKind::as_str),
                id = identifier.as_deref().unwrap_or("-"),
                "resource not found"
            );
            Resolution::NotFound
        }
        Err(e) => {
            debug!(error = %e, "request failed");
            Resolution::Failed(e)
        }
    };

    writer.publish(resolution);
}
