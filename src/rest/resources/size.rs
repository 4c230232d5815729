//! Size resource.

use serde::{Deserialize, Serialize};

/// A droplet size (plan).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Size {
    /// Unique slug, e.g. `s-1vcpu-1gb`.
    pub slug: String,

    /// Memory in megabytes.
    #[serde(default)]
    pub memory: u64,

    /// Number of virtual CPUs.
    #[serde(default)]
    pub vcpus: u32,

    /// Disk size in gigabytes.
    #[serde(default)]
    pub disk: u64,

    /// Monthly transfer allowance in terabytes.
    #[serde(default)]
    pub transfer: f64,

    /// Monthly price in US dollars.
    #[serde(default)]
    pub price_monthly: f64,

    /// Hourly price in US dollars.
    #[serde(default)]
    pub price_hourly: f64,

    /// Region slugs offering this size.
    #[serde(default)]
    pub regions: Vec<String>,

    /// Whether droplets can be created with this size.
    #[serde(default)]
    pub available: bool,
}
