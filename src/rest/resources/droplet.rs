//! Droplet resource.
//!
//! A [`Droplet`] is a virtual machine. Its provider status string is mapped
//! onto a provider-neutral [`LifecycleState`] so callers can reason about
//! instances without knowing DigitalOcean's vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::Image;
use super::region::Region;

/// Provider-neutral lifecycle of a compute instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Being provisioned.
    Pending,
    /// Powered on.
    Running,
    /// Powered off.
    Stopped,
    /// Archived or destroyed.
    Terminated,
    /// A status this crate does not recognize.
    Unknown,
}

/// Droplet status as reported by the provider.
///
/// Unrecognized values decode to [`DropletStatus::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    /// Provisioning.
    New,
    /// Running.
    Active,
    /// Powered off.
    Off,
    /// Archived.
    Archive,
    /// Any other value.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DropletStatus {
    /// Maps the provider status to a [`LifecycleState`].
    #[must_use]
    pub const fn lifecycle(self) -> LifecycleState {
        match self {
            Self::New => LifecycleState::Pending,
            Self::Active => LifecycleState::Running,
            Self::Off => LifecycleState::Stopped,
            Self::Archive => LifecycleState::Terminated,
            Self::Unknown => LifecycleState::Unknown,
        }
    }
}

/// A droplet (virtual machine).
///
/// `id` and `name` are required; a payload without them is malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Droplet {
    /// The unique identifier of the droplet.
    pub id: u64,

    /// The human-readable name.
    pub name: String,

    /// Memory in megabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,

    /// Disk size in gigabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,

    /// Whether the droplet is locked against actions.
    #[serde(default)]
    pub locked: bool,

    /// Provider status.
    #[serde(default)]
    pub status: DropletStatus,

    /// When the droplet was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Slug of the droplet's size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_slug: Option<String>,

    /// The region the droplet runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,

    /// The image the droplet was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,

    /// Tags attached to the droplet.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Droplet {
    /// Returns the provider-neutral lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> LifecycleState {
        self.status.lifecycle()
    }
}
