//! # mariner-core
//!
//! Geospatial ranking and favorite-sync coordination for the Mariner app.
//!
//! ## Features
//!
//! - **Great-circle math**: Haversine distance and initial bearing
//! - **Route legs**: per-leg distance/bearing, direction reversal that always re-annotates
//! - **Proximity ranking**: total order by distance with unknown locations last
//! - **Favorites projection**: ranked, searchable favorites view
//! - **Sync coordination**: per-favorite throttling and in-flight deduplication
//! - **Spatial queries**: R-tree backed radius and nearest-N lookups
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use mariner_core::prelude::*;
//!
//! let buoys: Vec<Arc<dyn LocatedEntity>> = vec![
//!     Arc::new(Station {
//!         id: StationIdentifier::new("44013"),
//!         name: "Boston".into(),
//!         location: Some(GeoPoint::new(42.346, -70.651)),
//!         owner: None,
//!     }),
//!     Arc::new(Station {
//!         id: StationIdentifier::new("44018"),
//!         name: "Cape Cod".into(),
//!         location: None,
//!         owner: None,
//!     }),
//! ];
//!
//! let here = GeoPoint::new(42.36, -71.06); // Boston Harbor
//! let ranked = project(&buoys, Some(here), "");
//! assert_eq!(ranked[0].display_name(), "Boston");
//! assert!(!ranked[1].distance.is_known());
//! ```

pub mod config;
pub mod favorites;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod ranking;
pub mod route;
pub mod spatial;
pub mod sync;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::CoreConfig;
    pub use crate::favorites::{project, project_from_store, select_favorites};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::provider::{
        EntityCatalog, LatestLocation, MemoryFavoriteStore, NavUnit, RoutePoint, Station,
    };
    pub use crate::ranking::{filter_by_query, rank, RankedEntity};
    pub use crate::route::{annotate, reverse, AnnotatedRoute, RouteLeg, Waypoint};
    pub use crate::spatial::queries::{bearing_degrees, distance_km};
    pub use crate::sync::{SyncCoordinator, SyncDriver, SyncOutcome, SyncPermit, SyncPhase, SyncState};
}

pub use prelude::*;
