//! Boundaries to the platform services the core consumes.
//!
//! The core never implements these against real storage, location hardware
//! or the network; the platform layer does.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::FavoriteKey;
use crate::models::types::{GeoPoint, Result};
use crate::route::Waypoint;

/// Latest position fix, absent until one has been acquired
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Option<GeoPoint>;
}

/// Source of truth for which entities are favorited
pub trait FavoriteStore: Send + Sync {
    fn add(&self, key: &FavoriteKey) -> Result<()>;

    fn remove(&self, key: &FavoriteKey) -> Result<()>;

    fn contains(&self, key: &FavoriteKey) -> bool;

    /// All favorited keys, in no particular order
    fn list(&self) -> Vec<FavoriteKey>;
}

/// Pushes favorite state to the remote store
pub trait SyncTransport: Send + Sync {
    fn push<'a>(
        &'a self,
        key: &'a FavoriteKey,
        is_favorite: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Loads ordered waypoints for a stored route (e.g. parsed from a GPX file)
pub trait WaypointSource: Send + Sync {
    fn load_waypoints<'a>(
        &'a self,
        route_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Waypoint>>> + Send + 'a>>;
}
