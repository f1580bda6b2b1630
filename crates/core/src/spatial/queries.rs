//! Great-circle distance and bearing.
//!
//! Uses the Haversine formula on the mean Earth radius. Everything here is
//! kilometre-based; converting to nautical or statute miles is a single
//! division left to callers.

use geo::{Bearing, Distance, Haversine, Point};

use crate::models::types::GeoPoint;

/// Mean Earth radius in kilometres (same sphere `geo::Haversine` uses)
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0088;

pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;
pub const KM_PER_STATUTE_MILE: f64 = 1.609_344;

/// Great-circle distance between two points in kilometres.
///
/// Identical points return exactly `0.0`.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }

    Haversine.distance(to_point(a), to_point(b)) / 1_000.0
}

/// Initial bearing from `a` toward `b` in degrees, normalized to `[0, 360)`.
///
/// Identical points (or anything that makes the bearing undefined) return
/// `0.0` rather than NaN.
pub fn bearing_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }

    let degrees = Haversine.bearing(to_point(a), to_point(b));
    if !degrees.is_finite() {
        return 0.0;
    }

    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

pub fn km_to_nautical_miles(km: f64) -> f64 {
    km / KM_PER_NAUTICAL_MILE
}

pub fn km_to_statute_miles(km: f64) -> f64 {
    km / KM_PER_STATUTE_MILE
}

fn to_point(p: GeoPoint) -> Point {
    p.into()
}

/// Kilometres covered by one degree of latitude on the mean sphere
pub fn km_per_degree() -> f64 {
    EARTH_MEAN_RADIUS_KM * std::f64::consts::PI / 180.0
}
