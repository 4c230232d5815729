//! Region resource.

use serde::{Deserialize, Serialize};

/// A datacenter region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    /// Unique slug, e.g. `nyc3`.
    pub slug: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Size slugs available in the region.
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Whether new droplets can be created here.
    #[serde(default)]
    pub available: bool,

    /// Feature flags such as `backups` or `ipv6`.
    #[serde(default)]
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_deserialization() {
        let region: Region = serde_json::from_value(json!({
            "name": "New York 3",
            "slug": "nyc3",
            "features": ["backups", "ipv6"],
            "available": true,
            "sizes": ["s-1vcpu-1gb"]
        }))
        .unwrap();

        assert_eq!(region.slug, "nyc3");
        assert_eq!(region.features, vec!["backups", "ipv6"]);
    }

    #[test]
    fn test_region_requires_slug() {
        assert!(serde_json::from_value::<Region>(json!({"name": "Nowhere"})).is_err());
    }
}
