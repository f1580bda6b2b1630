//! Entity providers and in-memory platform stand-ins.

pub mod memory;
pub mod static_provider;

pub use memory::{LatestLocation, MemoryFavoriteStore};
pub use static_provider::{EntityCatalog, NavUnit, RoutePoint, Station};
