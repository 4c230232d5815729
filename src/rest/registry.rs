//! Typed resource registry.
//!
//! Every [`ResourceKind`] maps to exactly one [`KindSpec`]: a URL template,
//! the JSON envelope key holding the payload, whether the payload is a single
//! object or an ordered collection, and the function that decodes one
//! element into an [`Entity`].
//!
//! # Decoding rules
//!
//! - A body carrying a top-level `id` together with a `message` is the
//!   provider's error shape and becomes a [`ProviderError`], whatever the
//!   HTTP status.
//! - A missing envelope key is a parse error.
//! - Singular kinds fail hard on a malformed payload.
//! - Collection kinds skip malformed elements (logged at `warn`) and keep
//!   every well-formed one, in order.
//!
//! # Example
//!
//! ```rust
//! use digitalocean_api::rest::{registry, Decoded, ResourceKind};
//! use serde_json::json;
//!
//! assert_eq!(registry::resolve(ResourceKind::Droplet), "droplets/{id}");
//!
//! let body = json!({"regions": [{"slug": "nyc3"}, {"name": "no slug"}]});
//! let decoded = registry::deserialize(ResourceKind::Regions, &body).unwrap();
//! assert!(matches!(decoded, Decoded::Collection(ref items) if items.len() == 1));
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::rest::errors::{ProviderError, ResourceError};
use crate::rest::resources::{ActionRecord, Droplet, Entity, Image, Region, Size, SshKey};

/// Whether a kind decodes to one object or to an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plurality {
    /// One object.
    Single,
    /// An ordered sequence of objects.
    Collection,
}

/// Resource kinds known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// One region.
    Region,
    /// All regions.
    Regions,
    /// One droplet.
    Droplet,
    /// All droplets.
    Droplets,
    /// One image.
    Image,
    /// All images.
    Images,
    /// One size.
    Size,
    /// All sizes.
    Sizes,
    /// One SSH key.
    Key,
    /// All SSH keys.
    Keys,
    /// One action.
    Action,
    /// All actions on the account.
    Actions,
    /// Action history of one droplet.
    DropletActions,
}

impl ResourceKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 13] = [
        Self::Region,
        Self::Regions,
        Self::Droplet,
        Self::Droplets,
        Self::Image,
        Self::Images,
        Self::Size,
        Self::Sizes,
        Self::Key,
        Self::Keys,
        Self::Action,
        Self::Actions,
        Self::DropletActions,
    ];

    /// Returns the registry entry for this kind.
    #[must_use]
    pub fn spec(self) -> &'static KindSpec {
        &KIND_TABLE[self as usize]
    }

    /// Returns the URL template.
    #[must_use]
    pub fn template(self) -> &'static str {
        self.spec().template
    }

    /// Returns the JSON envelope key.
    #[must_use]
    pub fn envelope_key(self) -> &'static str {
        self.spec().envelope_key
    }

    /// Returns whether the kind is singular or a collection.
    #[must_use]
    pub fn plurality(self) -> Plurality {
        self.spec().plurality
    }

    /// Returns `true` for collection kinds.
    #[must_use]
    pub fn is_collection(self) -> bool {
        self.plurality() == Plurality::Collection
    }

    /// Returns the snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Regions => "regions",
            Self::Droplet => "droplet",
            Self::Droplets => "droplets",
            Self::Image => "image",
            Self::Images => "images",
            Self::Size => "size",
            Self::Sizes => "sizes",
            Self::Key => "key",
            Self::Keys => "keys",
            Self::Action => "action",
            Self::Actions => "actions",
            Self::DropletActions => "droplet_actions",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes one JSON element into an [`Entity`].
pub type ParseFn = fn(&Value) -> Result<Entity, serde_json::Error>;

/// A registry entry.
#[derive(Clone, Copy)]
pub struct KindSpec {
    /// The kind this entry describes.
    pub kind: ResourceKind,
    /// URL template relative to the base endpoint; may hold an `{id}` segment.
    pub template: &'static str,
    /// Key under which the payload is nested in the response body.
    pub envelope_key: &'static str,
    /// Single object or collection.
    pub plurality: Plurality,
    parse: ParseFn,
}

impl KindSpec {
    const fn new(
        kind: ResourceKind,
        template: &'static str,
        envelope_key: &'static str,
        plurality: Plurality,
        parse: ParseFn,
    ) -> Self {
        Self {
            kind,
            template,
            envelope_key,
            plurality,
            parse,
        }
    }

    /// Decodes one element with this kind's rule.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the element is malformed.
    pub fn parse_element(&self, value: &Value) -> Result<Entity, serde_json::Error> {
        (self.parse)(value)
    }
}

impl fmt::Debug for KindSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindSpec")
            .field("kind", &self.kind)
            .field("template", &self.template)
            .field("envelope_key", &self.envelope_key)
            .field("plurality", &self.plurality)
            .finish_non_exhaustive()
    }
}

fn parse_as<T>(value: &Value) -> Result<Entity, serde_json::Error>
where
    T: DeserializeOwned + Into<Entity>,
{
    T::deserialize(value).map(Into::into)
}

use Plurality::{Collection, Single};

const KINDS: [KindSpec; 13] = [
    KindSpec::new(ResourceKind::Region, "regions/{id}", "region", Single, parse_as::<Region>),
    KindSpec::new(ResourceKind::Regions, "regions", "regions", Collection, parse_as::<Region>),
    KindSpec::new(ResourceKind::Droplet, "droplets/{id}", "droplet", Single, parse_as::<Droplet>),
    KindSpec::new(ResourceKind::Droplets, "droplets", "droplets", Collection, parse_as::<Droplet>),
    KindSpec::new(ResourceKind::Image, "images/{id}", "image", Single, parse_as::<Image>),
    KindSpec::new(ResourceKind::Images, "images", "images", Collection, parse_as::<Image>),
    KindSpec::new(ResourceKind::Size, "sizes/{id}", "size", Single, parse_as::<Size>),
    KindSpec::new(ResourceKind::Sizes, "sizes", "sizes", Collection, parse_as::<Size>),
    KindSpec::new(ResourceKind::Key, "account/keys/{id}", "ssh_key", Single, parse_as::<SshKey>),
    KindSpec::new(ResourceKind::Keys, "account/keys", "ssh_keys", Collection, parse_as::<SshKey>),
    KindSpec::new(ResourceKind::Action, "actions/{id}", "action", Single, parse_as::<ActionRecord>),
    KindSpec::new(ResourceKind::Actions, "actions", "actions", Collection, parse_as::<ActionRecord>),
    KindSpec::new(
        ResourceKind::DropletActions,
        "droplets/{id}/actions",
        "actions",
        Collection,
        parse_as::<ActionRecord>,
    ),
];

// Table position must equal the kind's discriminant
const _: () = {
    let mut i = 0;
    while i < KINDS.len() {
        assert!(KINDS[i].kind as usize == i);
        i += 1;
    }
};

static KIND_TABLE: [KindSpec; 13] = KINDS;

/// The result of decoding a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A singular kind's object.
    Single(Entity),
    /// A collection kind's well-formed elements, in order.
    Collection(Vec<Entity>),
}

impl Decoded {
    /// Flattens into a vector of entities.
    #[must_use]
    pub fn into_vec(self) -> Vec<Entity> {
        match self {
            Self::Single(entity) => vec![entity],
            Self::Collection(entities) => entities,
        }
    }

    /// Returns the single entity, or `None` for a collection.
    #[must_use]
    pub fn into_single(self) -> Option<Entity> {
        match self {
            Self::Single(entity) => Some(entity),
            Self::Collection(_) => None,
        }
    }
}

/// Returns the URL template for `kind`.
#[must_use]
pub fn resolve(kind: ResourceKind) -> &'static str {
    kind.template()
}

/// Iterates over every registry entry.
pub fn entries() -> impl Iterator<Item = &'static KindSpec> {
    KIND_TABLE.iter()
}

/// Decodes a response body for `kind`.
///
/// # Errors
///
/// - [`ResourceError::Provider`] if the body carries the embedded error shape
/// - [`ResourceError::Parse`] if the envelope key is missing, a collection
///   payload is not an array, or a singular payload is malformed
pub fn deserialize(kind: ResourceKind, body: &Value) -> Result<Decoded, ResourceError> {
    if let Some(error) = ProviderError::from_embedded(None, body) {
        return Err(ResourceError::Provider(error));
    }

    let spec = kind.spec();
    let payload = body.get(spec.envelope_key).ok_or_else(|| ResourceError::Parse {
        kind,
        reason: format!("missing envelope key '{}'", spec.envelope_key),
    })?;

    match spec.plurality {
        Plurality::Single => spec
            .parse_element(payload)
            .map(Decoded::Single)
            .map_err(|e| ResourceError::Parse {
                kind,
                reason: e.to_string(),
            }),
        Plurality::Collection => {
            let elements = payload.as_array().ok_or_else(|| ResourceError::Parse {
                kind,
                reason: format!("'{}' is not an array", spec.envelope_key),
            })?;

            let mut entities = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                match spec.parse_element(element) {
                    Ok(entity) => entities.push(entity),
                    Err(e) => {
                        warn!(%kind, index, error = %e, "skipping malformed collection element");
                    }
                }
            }
            Ok(Decoded::Collection(entities))
        }
    }
}
