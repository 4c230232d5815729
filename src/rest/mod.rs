//! Resource layer for the DigitalOcean API.
//!
//! This module maps raw JSON envelopes onto typed resources:
//!
//! - **[`registry`]**: the table of [`ResourceKind`]s with their URL template,
//!   envelope key and decoding rule
//! - **[`resources`]**: the typed snapshots ([`Droplet`](resources::Droplet),
//!   [`ActionRecord`](resources::ActionRecord), ...) and the [`Entity`](resources::Entity) union
//! - **[`ResourceError`]**: semantic errors for resource operations
//!
//! # Example
//!
//! ```rust
//! use digitalocean_api::rest::{registry, Decoded, ResourceKind};
//! use digitalocean_api::rest::resources::{ActionRecord, ActionStatus};
//! use serde_json::json;
//!
//! let body = json!({"action": {"id": 7, "status": "in-progress", "type": "reboot"}});
//! let decoded = registry::deserialize(ResourceKind::Action, &body).unwrap();
//!
//! let Decoded::Single(entity) = decoded else { unreachable!() };
//! let action = ActionRecord::try_from(entity).unwrap();
//! assert_eq!(action.status, ActionStatus::InProgress);
//! ```

mod errors;
pub mod registry;
pub mod resources;

pub use errors::{ProviderError, ResourceError, ValidationError};
pub use registry::{Decoded, KindSpec, Plurality, ResourceKind};
