//! Entity models, value types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::LocatedEntity;
pub use types::{CoreError, Distance, EntityKind, GeoPoint, Result};
