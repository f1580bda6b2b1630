//! Type-safe, cheap-to-clone identifiers for located entities and favorites.
//!
//! All identifiers use Arc<str> so they can be shared between the ranking
//! pipeline, the favorite store and the sync coordinator without copying.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::models::types::EntityKind;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

impl_identifier!(StationIdentifier);
impl_identifier!(NavUnitIdentifier);
impl_identifier!(RoutePointIdentifier);
impl_identifier!(FavoriteKey);

impl FavoriteKey {
    /// Key used by default for an entity: `<kind>:<identity>`.
    ///
    /// Identities are only unique within one entity kind, so the kind prefix
    /// keeps a buoy and a nav unit that share an id from colliding in the
    /// favorite store or the sync map.
    pub fn for_entity(kind: EntityKind, identity: &str) -> Self {
        Self::new(format!("{}:{}", kind.as_str(), identity))
    }
}
