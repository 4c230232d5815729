//! Typed resource snapshots.
//!
//! Each resource is an immutable snapshot of provider state at fetch time.
//! A fresh fetch produces a fresh value; nothing in the crate mutates an
//! entity after handing it to the caller.
//!
//! [`Entity`] is the tagged union returned by the registry's decoder. Every
//! concrete type converts into it with `From` and back out with `TryFrom`:
//!
//! ```rust
//! use digitalocean_api::rest::resources::{Entity, Region};
//!
//! let region = Region {
//!     slug: "nyc3".to_string(),
//!     name: "New York 3".to_string(),
//!     sizes: vec![],
//!     available: true,
//!     features: vec![],
//! };
//!
//! let entity = Entity::from(region.clone());
//! assert_eq!(Region::try_from(entity).unwrap(), region);
//! ```

mod action;
mod droplet;
mod image;
mod region;
mod size;
mod ssh_key;

pub use action::{ActionRecord, ActionStatus};
pub use droplet::{Droplet, DropletStatus, LifecycleState};
pub use image::Image;
pub use region::Region;
pub use size::Size;
pub use ssh_key::SshKey;

/// A decoded resource of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A droplet.
    Droplet(Droplet),
    /// An image.
    Image(Image),
    /// A size.
    Size(Size),
    /// A region.
    Region(Region),
    /// An SSH key.
    SshKey(SshKey),
    /// An action record.
    Action(ActionRecord),
}

impl Entity {
    /// Returns the action record, if this entity is one.
    #[must_use]
    pub const fn as_action(&self) -> Option<&ActionRecord> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }
}

macro_rules! entity_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Entity {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<Entity> for $ty {
                type Error = Entity;

                fn try_from(entity: Entity) -> Result<Self, Self::Error> {
                    match entity {
                        Entity::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

entity_conversions! {
    Droplet => Droplet,
    Image => Image,
    Size => Size,
    Region => Region,
    SshKey => SshKey,
    Action => ActionRecord,
}
