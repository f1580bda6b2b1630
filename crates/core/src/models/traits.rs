//! Core traits for located entities.
//!
//! These traits define the public interface the ranking pipeline works
//! against. Implementations can be in-memory, database-backed, or bridged
//! from the platform layer.

use crate::identifiers::FavoriteKey;
use crate::models::types::*;

/// Anything that can appear in a distance-ranked list: buoys, nav units,
/// route points.
pub trait LocatedEntity: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Identity within the entity's kind (e.g. an NDBC station id)
    fn identity(&self) -> &str;

    /// Display name used for tie-breaking and search
    fn display_name(&self) -> &str;

    /// Position, if the source record carries one
    fn location(&self) -> Option<GeoPoint>;

    /// Key used by the favorite store and the sync coordinator
    fn favorite_key(&self) -> FavoriteKey {
        FavoriteKey::for_entity(self.kind(), self.identity())
    }
}
