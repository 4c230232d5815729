//! Image resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A distribution image, snapshot or backup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// The unique identifier of the image.
    pub id: u64,

    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The distribution, e.g. `Ubuntu`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    /// Unique slug; only public images carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Whether the image is public.
    #[serde(default)]
    pub public: bool,

    /// Region slugs where the image is available.
    #[serde(default)]
    pub regions: Vec<String>,

    /// Image type, e.g. `base` or `snapshot`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,

    /// Minimum disk size in gigabytes required to use the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_disk_size: Option<u64>,

    /// When the image was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
