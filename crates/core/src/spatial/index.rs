//! R-tree nodes for spatial indexing.
//!
//! Wraps located entities with their coordinates for candidate lookups.
//!
//! ## Two-Stage Filtering
//!
//! The catalog queries use a two-stage filtering approach:
//! 1. **R-tree filter**: a lat/lon envelope (in degrees) that is guaranteed
//!    to contain every point within the requested great-circle radius
//! 2. **Haversine filter**: exact great-circle distance on the candidates
//!
//! Envelopes that would touch a pole or wrap the antimeridian are not
//! representable as a single box, so callers fall back to a full scan.

use std::sync::Arc;

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::traits::LocatedEntity;
use crate::models::types::GeoPoint;
use crate::spatial::queries::EARTH_MEAN_RADIUS_KM;

// ============================================================================
// Entity Spatial Node
// ============================================================================

#[derive(Clone)]
pub struct EntityNode {
    pub entity: Arc<dyn LocatedEntity>,
    pub location: GeoPoint,
    point: [f64; 2],
}

impl EntityNode {
    pub fn new(location: GeoPoint, entity: Arc<dyn LocatedEntity>) -> Self {
        Self {
            entity,
            location,
            point: [location.longitude, location.latitude],
        }
    }
}

impl RTreeObject for EntityNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EntityNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ============================================================================
// Search Envelope
// ============================================================================

// Slack for rounding in the trigonometry below, in degrees
const ENVELOPE_MARGIN_DEG: f64 = 1e-9;

/// Smallest lon/lat box containing the spherical cap of `radius_km` around
/// `center`, or `None` when that cap reaches a pole or crosses the
/// antimeridian.
pub fn search_envelope(center: GeoPoint, radius_km: f64) -> Option<AABB<[f64; 2]>> {
    let angular = radius_km / EARTH_MEAN_RADIUS_KM;
    if angular >= std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let lat = center.latitude.to_radians();
    let cos_lat = lat.cos();
    let sin_angular = angular.sin();
    if sin_angular >= cos_lat {
        return None;
    }

    let dlat = angular.to_degrees() + ENVELOPE_MARGIN_DEG;
    let dlon = (sin_angular / cos_lat).asin().to_degrees() + ENVELOPE_MARGIN_DEG;

    let min_lat = center.latitude - dlat;
    let max_lat = center.latitude + dlat;
    let min_lon = center.longitude - dlon;
    let max_lon = center.longitude + dlon;

    if min_lat < -90.0 || max_lat > 90.0 || min_lon < -180.0 || max_lon > 180.0 {
        return None;
    }

    Some(AABB::from_corners([min_lon, min_lat], [max_lon, max_lat]))
}
