//! Plain records crossing the FFI boundary, and their core conversions.

use std::sync::Arc;

use mariner_core::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct FfiGeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<FfiGeoPoint> for GeoPoint {
    fn from(p: FfiGeoPoint) -> Self {
        GeoPoint::new(p.latitude, p.longitude)
    }
}

impl From<GeoPoint> for FfiGeoPoint {
    fn from(p: GeoPoint) -> Self {
        Self {
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum FfiEntityKind {
    Station,
    NavUnit,
    RoutePoint,
}

impl From<FfiEntityKind> for EntityKind {
    fn from(kind: FfiEntityKind) -> Self {
        match kind {
            FfiEntityKind::Station => EntityKind::Station,
            FfiEntityKind::NavUnit => EntityKind::NavUnit,
            FfiEntityKind::RoutePoint => EntityKind::RoutePoint,
        }
    }
}

impl From<EntityKind> for FfiEntityKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Station => FfiEntityKind::Station,
            EntityKind::NavUnit => FfiEntityKind::NavUnit,
            EntityKind::RoutePoint => FfiEntityKind::RoutePoint,
        }
    }
}

/// An entity snapshot as the platform layer knows it
#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct FfiEntity {
    pub kind: FfiEntityKind,
    pub identity: String,
    pub display_name: String,
    pub location: Option<FfiGeoPoint>,
    /// Station owner, nav unit facility type; ignored for route points
    pub detail: Option<String>,
    /// Position within the route; only meaningful for route points
    pub sequence: u32,
}

impl FfiEntity {
    pub fn into_entity(self) -> Arc<dyn LocatedEntity> {
        let location = self.location.map(GeoPoint::from);
        let name: Arc<str> = self.display_name.into();
        let detail: Option<Arc<str>> = self.detail.map(Into::into);

        match self.kind {
            FfiEntityKind::Station => Arc::new(Station {
                id: StationIdentifier::new(self.identity),
                name,
                location,
                owner: detail,
            }),
            FfiEntityKind::NavUnit => Arc::new(NavUnit {
                id: NavUnitIdentifier::new(self.identity),
                name,
                location,
                facility_type: detail,
            }),
            FfiEntityKind::RoutePoint => Arc::new(RoutePoint {
                id: RoutePointIdentifier::new(self.identity),
                name,
                location,
                sequence: self.sequence,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct FfiRankedEntity {
    pub kind: FfiEntityKind,
    pub identity: String,
    pub display_name: String,
    pub favorite_key: String,
    /// `None` when either side of the measurement has no location
    pub distance_km: Option<f64>,
    pub distance_nautical_miles: Option<f64>,
}

impl From<&RankedEntity> for FfiRankedEntity {
    fn from(ranked: &RankedEntity) -> Self {
        Self {
            kind: ranked.entity.kind().into(),
            identity: ranked.identity().to_owned(),
            display_name: ranked.display_name().to_owned(),
            favorite_key: ranked.entity.favorite_key().to_string(),
            distance_km: ranked.distance.km(),
            distance_nautical_miles: ranked.distance.nautical_miles(),
        }
    }
}

pub fn ranked_to_ffi(ranked: &[RankedEntity]) -> Vec<FfiRankedEntity> {
    ranked.iter().map(FfiRankedEntity::from).collect()
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct FfiWaypoint {
    pub point: FfiGeoPoint,
    pub name: Option<String>,
}

impl From<FfiWaypoint> for Waypoint {
    fn from(w: FfiWaypoint) -> Self {
        Waypoint {
            point: w.point.into(),
            name: w.name.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct FfiRouteLeg {
    pub point: FfiGeoPoint,
    pub name: Option<String>,
    pub distance_to_next_nautical_miles: f64,
    pub bearing_to_next_degrees: f64,
}

impl From<&RouteLeg> for FfiRouteLeg {
    fn from(leg: &RouteLeg) -> Self {
        Self {
            point: leg.point.into(),
            name: leg.name.as_deref().map(str::to_owned),
            distance_to_next_nautical_miles: leg.distance_to_next_nautical_miles,
            bearing_to_next_degrees: leg.bearing_to_next_degrees,
        }
    }
}

impl From<FfiRouteLeg> for RouteLeg {
    fn from(leg: FfiRouteLeg) -> Self {
        RouteLeg {
            point: leg.point.into(),
            name: leg.name.map(Into::into),
            distance_to_next_nautical_miles: leg.distance_to_next_nautical_miles,
            bearing_to_next_degrees: leg.bearing_to_next_degrees,
        }
    }
}
