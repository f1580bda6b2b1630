//! Core value types, enums and errors.

use std::cmp::Ordering;
use std::fmt;

use crate::identifiers::FavoriteKey;
use crate::spatial::queries::KM_PER_NAUTICAL_MILE;

// ============================================================================
// Coordinates
// ============================================================================

/// A position in degrees (WGS-84 assumed, no datum conversion).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

impl From<geo::Point> for GeoPoint {
    fn from(p: geo::Point) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// The kinds of located entity the app ranks and favorites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    /// Weather / wave buoy
    Station,
    NavUnit,
    RoutePoint,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Station => "station",
            Self::NavUnit => "nav_unit",
            Self::RoutePoint => "route_point",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Distance
// ============================================================================

/// Distance from the user to an entity.
///
/// `Unknown` covers both "no user fix yet" and "entity has no coordinates".
/// It orders after every `Known` value, so entities without a distance
/// always end up at the bottom of a ranked list.
#[derive(Clone, Copy, Debug)]
pub enum Distance {
    Known(f64),
    Unknown,
}

impl Distance {
    /// Flat-float stand-in for `Unknown`, for consumers that can only carry an f64.
    pub const SENTINEL_KM: f64 = f64::MAX;

    /// Non-finite values become `Unknown`.
    pub fn from_km(km: f64) -> Self {
        if km.is_finite() {
            // -0.0 and 0.0 must rank equal under total_cmp
            Self::Known(km + 0.0)
        } else {
            Self::Unknown
        }
    }

    pub fn km(&self) -> Option<f64> {
        match self {
            Self::Known(km) => Some(*km),
            Self::Unknown => None,
        }
    }

    pub fn nautical_miles(&self) -> Option<f64> {
        self.km().map(|km| km / KM_PER_NAUTICAL_MILE)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_sentinel_km(&self) -> f64 {
        self.km().unwrap_or(Self::SENTINEL_KM)
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a.total_cmp(b),
            (Self::Known(_), Self::Unknown) => Ordering::Less,
            (Self::Unknown, Self::Known(_)) => Ordering::Greater,
            (Self::Unknown, Self::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {kind} {identity}")]
    EntityNotFound { kind: EntityKind, identity: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Sync transport failed for {key}: {message}")]
    Transport { key: FavoriteKey, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
