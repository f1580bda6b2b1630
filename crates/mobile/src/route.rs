//! Route-details screen helpers. Stateless: the platform keeps the legs.

use mariner_core::{route, spatial};

use crate::records::{FfiGeoPoint, FfiRouteLeg, FfiWaypoint};

#[uniffi::export]
pub fn annotate_route(waypoints: Vec<FfiWaypoint>) -> Vec<FfiRouteLeg> {
    let points: Vec<_> = waypoints.into_iter().map(Into::into).collect();
    route::annotate(&points).iter().map(FfiRouteLeg::from).collect()
}

/// Reverse travel direction. Legs are recomputed, never flipped.
#[uniffi::export]
pub fn reverse_route(legs: Vec<FfiRouteLeg>) -> Vec<FfiRouteLeg> {
    let legs: Vec<_> = legs.into_iter().map(Into::into).collect();
    route::reverse(&legs).iter().map(FfiRouteLeg::from).collect()
}

#[uniffi::export]
pub fn route_total_distance_nautical_miles(legs: Vec<FfiRouteLeg>) -> f64 {
    let legs: Vec<_> = legs.into_iter().map(Into::into).collect();
    route::total_distance_nautical_miles(&legs)
}

#[uniffi::export]
pub fn geo_distance_km(a: FfiGeoPoint, b: FfiGeoPoint) -> f64 {
    spatial::distance_km(a.into(), b.into())
}

#[uniffi::export]
pub fn geo_bearing_degrees(a: FfiGeoPoint, b: FfiGeoPoint) -> f64 {
    spatial::bearing_degrees(a.into(), b.into())
}
