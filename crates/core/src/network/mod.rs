//! Platform service abstractions.

pub mod traits;

pub use traits::{FavoriteStore, LocationProvider, SyncTransport, WaypointSource};
