//! Spatial indexing and great-circle math.

pub mod index;
pub mod queries;

pub use queries::{bearing_degrees, distance_km, km_to_nautical_miles, km_to_statute_miles};
