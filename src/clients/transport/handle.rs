//! One-shot response handles.
//!
//! A [`ResponseHandle`] is created empty when a page request is dispatched
//! and resolved exactly once by the task that performed the request. Any
//! number of clones may read it; every accessor suspends until the terminal
//! state is published and then returns immediately on later calls.
//!
//! Terminal states:
//!
//! - a page of data (status, headers, raw bytes, optional JSON, next handle)
//! - not found (HTTP 404), reported as an absence rather than an error
//! - a failure, re-surfaced to every reader as the same [`HttpError`]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use crate::clients::errors::HttpError;
use crate::clients::http_response::HttpResponse;
use crate::rest::registry::{self, Decoded, ResourceKind};
use crate::rest::resources::Entity;
use crate::rest::ResourceError;

const ABANDONED: &str = "response task ended without a result";

/// A resolved page.
#[derive(Debug)]
pub(crate) struct Page {
    pub(crate) response: HttpResponse,
    pub(crate) next: Option<ResponseHandle>,
}

/// Terminal state of a handle.
#[derive(Debug)]
pub(crate) enum Resolution {
    Page(Page),
    NotFound,
    Failed(HttpError),
}

type Slot = Option<Arc<Resolution>>;

/// The single writer of a [`ResponseHandle`].
///
/// Dropping the writer without calling [`HandleWriter::publish`] resolves
/// every reader with [`HttpError::Malformed`].
#[derive(Debug)]
pub(crate) struct HandleWriter {
    tx: watch::Sender<Slot>,
}

impl HandleWriter {
    pub(crate) fn publish(self, resolution: Resolution) {
        self.tx.send_replace(Some(Arc::new(resolution)));
    }
}

/// A future-like handle to one page of a response.
///
/// # Example
///
/// ```rust,ignore
/// use digitalocean_api::rest::ResourceKind;
///
/// let handle = transport.fetch(ResourceKind::Droplets, None, &[])?;
/// println!("status {}", handle.status().await?);
///
/// let mut page = Some(handle);
/// while let Some(current) = page {
///     println!("{:?}", current.json().await?);
///     page = current.next_page().await;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ResponseHandle {
    rx: watch::Receiver<Slot>,
    kind: Option<ResourceKind>,
    identifier: Option<String>,
}

// Verify ResponseHandle is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResponseHandle>();
};

impl ResponseHandle {
    /// Creates an unresolved handle together with its writer.
    pub(crate) fn channel(
        kind: Option<ResourceKind>,
        identifier: Option<String>,
    ) -> (HandleWriter, Self) {
        let (tx, rx) = watch::channel(None);
        (
            HandleWriter { tx },
            Self {
                rx,
                kind,
                identifier,
            },
        )
    }

    /// Returns the resource kind this handle was fetched for, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<ResourceKind> {
        self.kind
    }

    /// Returns `true` once the terminal state has been published.
    ///
    /// Never suspends.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }

    async fn resolved(&self) -> Arc<Resolution> {
        let mut rx = self.rx.clone();
        let published = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|slot| slot.clone());
        published.unwrap_or_else(|| {
            Arc::new(Resolution::Failed(HttpError::Malformed(ABANDONED.to_string())))
        })
    }

    /// Waits for the terminal state with an overall bound.
    ///
    /// Returns `false` if `timeout` elapsed first. The handle stays usable
    /// and may still resolve later.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.resolved()).await.is_ok()
    }

    /// Returns the HTTP status code of the page.
    ///
    /// A not-found handle reports 404.
    ///
    /// # Errors
    ///
    /// Returns the captured [`HttpError`] if the request failed.
    pub async fn status(&self) -> Result<u16, HttpError> {
        match &*self.resolved().await {
            Resolution::Page(page) => Ok(page.response.code),
            Resolution::NotFound => Ok(404),
            Resolution::Failed(error) => Err(error.clone()),
        }
    }

    /// Returns the parsed JSON body, or `None` for a not-found handle or a
    /// body that is empty or not JSON.
    ///
    /// # Errors
    ///
    /// Returns the captured [`HttpError`] if the request failed.
    pub async fn json(&self) -> Result<Option<Value>, HttpError> {
        match &*self.resolved().await {
            Resolution::Page(page) => Ok(page.response.body.clone()),
            Resolution::NotFound => Ok(None),
            Resolution::Failed(error) => Err(error.clone()),
        }
    }

    /// Returns the raw response bytes (empty for a not-found handle).
    ///
    /// # Errors
    ///
    /// Returns the captured [`HttpError`] if the request failed.
    pub async fn raw_body(&self) -> Result<Vec<u8>, HttpError> {
        match &*self.resolved().await {
            Resolution::Page(page) => Ok(page.response.raw.clone()),
            Resolution::NotFound => Ok(Vec::new()),
            Resolution::Failed(error) => Err(error.clone()),
        }
    }

    /// Returns the full response of the page, if one was received.
    ///
    /// # Errors
    ///
    /// Returns the captured [`HttpError`] if the request failed.
    pub async fn response(&self) -> Result<Option<HttpResponse>, HttpError> {
        match &*self.resolved().await {
            Resolution::Page(page) => Ok(Some(page.response.clone())),
            Resolution::NotFound => Ok(None),
            Resolution::Failed(error) => Err(error.clone()),
        }
    }

    /// Returns `true` when no further page follows this one.
    ///
    /// Not-found and failed handles are complete.
    pub async fn is_complete(&self) -> bool {
        match &*self.resolved().await {
            Resolution::Page(page) => page.next.is_none(),
            Resolution::NotFound | Resolution::Failed(_) => true,
        }
    }

    /// Returns the handle of the next page, if the listing continues.
    pub async fn next_page(&self) -> Option<Self> {
        match &*self.resolved().await {
            Resolution::Page(page) => page.next.clone(),
            Resolution::NotFound | Resolution::Failed(_) => None,
        }
    }

    /// Returns `true` if the request resolved with HTTP 404.
    pub async fn is_not_found(&self) -> bool {
        matches!(&*self.resolved().await, Resolution::NotFound)
    }

    /// Decodes this page with the registry rule of `kind`.
    ///
    /// Returns `Ok(None)` for a not-found handle.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request failed or the body does not
    /// decode for `kind`.
    pub async fn decode_as(&self, kind: ResourceKind) -> Result<Option<Decoded>, ResourceError> {
        match &*self.resolved().await {
            Resolution::NotFound => Ok(None),
            Resolution::Failed(error) => Err(error.clone().into()),
            Resolution::Page(page) => {
                let body = page.response.body.as_ref().ok_or_else(|| ResourceError::Parse {
                    kind,
                    reason: "response body is empty or not JSON".to_string(),
                })?;
                registry::deserialize(kind, body)
                    .map(Some)
                    .map_err(|error| match error {
                        ResourceError::Provider(mut provider) => {
                            provider.status.get_or_insert(page.response.code);
                            ResourceError::Provider(provider)
                        }
                        other => other,
                    })
            }
        }
    }

    /// Decodes this page with the kind it was fetched for.
    ///
    /// # Errors
    ///
    /// As [`ResponseHandle::decode_as`]; a handle created without a kind
    /// yields [`HttpError::Malformed`].
    pub async fn decode(&self) -> Result<Option<Decoded>, ResourceError> {
        let kind = self.require_kind()?;
        self.decode_as(kind).await
    }

    /// Walks the page chain and returns every element in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the first page was a 404, and
    /// the first error met along the chain otherwise.
    pub async fn collect(&self) -> Result<Vec<Entity>, ResourceError> {
        let kind = self.require_kind()?;
        let mut entities = Vec::new();
        let mut current = Some(self.clone());
        let mut first = true;

        while let Some(handle) = current {
            match handle.decode_as(kind).await? {
                Some(decoded) => entities.extend(decoded.into_vec()),
                None if first => {
                    return Err(ResourceError::NotFound {
                        kind,
                        id: self.identifier.clone(),
                    });
                }
                None => {}
            }
            first = false;
            current = handle.next_page().await;
        }

        Ok(entities)
    }

    fn require_kind(&self) -> Result<ResourceKind, ResourceError> {
        self.kind.ok_or_else(|| {
            ResourceError::Http(HttpError::Malformed(
                "handle was not created for a resource kind".to_string(),
            ))
        })
    }
}
