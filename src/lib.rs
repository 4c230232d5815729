//! # DigitalOcean API Rust Adapter
//!
//! An asynchronous adapter for the DigitalOcean REST API: signed requests,
//! typed resources, page-by-page streaming and droplet actions that wait for
//! the provider to settle.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`DigitalOceanConfig`] and [`DigitalOceanConfigBuilder`]
//! - Validated newtypes for tokens, key pairs and endpoints
//! - Bearer-token or HMAC-signed authentication via [`Credentials`]
//! - A registry of resource kinds with URL templates and envelope decoding
//!   ([`rest::registry`])
//! - A bounded-concurrency [`Transport`] that fetches each page in its own
//!   task and returns a [`ResponseHandle`] immediately
//! - An [`ActionExecutor`](actions::ActionExecutor) for mutations and a
//!   [`CompletionPoller`](actions::CompletionPoller) that waits until a
//!   droplet has no action in progress
//!
//! ## Quick Start
//!
//! ```rust
//! use digitalocean_api::{ApiToken, Credentials, DigitalOceanConfig};
//! use std::time::Duration;
//!
//! let config = DigitalOceanConfig::builder()
//!     .credentials(Credentials::bearer(ApiToken::new("dop_v1_example").unwrap()))
//!     .max_concurrent_requests(8)
//!     .poll_interval(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 1000);
//! ```
//!
//! ## Signed Requests
//!
//! ```rust
//! use digitalocean_api::{AccessKeyId, ClientLabel, Credentials, DigitalOceanConfig, SecretKey};
//!
//! let credentials = Credentials::signed(
//!     AccessKeyId::new("AK123").unwrap(),
//!     SecretKey::new("s3cr3t").unwrap(),
//!     ClientLabel::new("inventory-sync").unwrap(),
//! );
//! let config = DigitalOceanConfig::builder().credentials(credentials).build().unwrap();
//! ```
//!
//! ## Reading Resources
//!
//! ```rust,ignore
//! use digitalocean_api::{DigitalOceanClient, ResourceKind};
//!
//! let client = DigitalOceanClient::new(config)?;
//!
//! // Typed helpers
//! for droplet in client.droplets().await? {
//!     println!("{} {:?}", droplet.name, droplet.lifecycle());
//! }
//!
//! // Or drive the handle chain directly
//! let handle = client.transport().fetch(ResourceKind::Regions, None, &[])?;
//! let first_page = handle.decode().await?;
//! if let Some(next) = handle.next_page().await {
//!     let second_page = next.decode().await?;
//! }
//! ```
//!
//! ## Droplet Actions
//!
//! ```rust,ignore
//! let droplet = client.launch("web-1", "nyc3", "s-1vcpu-1gb", "ubuntu-24-04-x64").await?;
//! let id = droplet.id.to_string();
//!
//! client.stop(&id, true).await?;
//! client.resize(&id, "s-2vcpu-4gb", true).await?;
//! client.start(&id, false).await?;
//! client.terminate(&id).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and action parameters are checked before any request
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod actions;
pub mod auth;
mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{Credentials, SigningKey};
pub use client::DigitalOceanClient;
pub use config::{
    AccessKeyId, ApiToken, BaseEndpoint, ClientLabel, DigitalOceanConfig,
    DigitalOceanConfigBuilder, SecretKey,
};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, PaginationInfo,
    RequestTarget, ResponseHandle, Transport,
};

// Re-export resource types
pub use actions::{ActionExecutor, ActionRequest, CompletionPoller, PollOutcome};
pub use rest::resources::{
    ActionRecord, ActionStatus, Droplet, DropletStatus, Entity, Image, LifecycleState, Region,
    Size, SshKey,
};
pub use rest::{Decoded, ProviderError, ResourceError, ResourceKind, ValidationError};
