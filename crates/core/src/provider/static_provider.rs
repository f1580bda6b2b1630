//! In-memory entity catalog backed by a bulk-loaded snapshot.
//!
//! Stores every located entity with an id lookup map and an R-tree over the
//! ones that have coordinates, for radius and nearest-N queries.

use std::collections::HashMap;
use std::sync::Arc;

use rstar::RTree;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};
use crate::ranking::{sort_ranked, RankedEntity};
use crate::spatial::index::{search_envelope, EntityNode};
use crate::spatial::queries::distance_km;

// ============================================================================
// Concrete Implementations of Traits
// ============================================================================

/// A buoy or weather station
#[derive(Clone, Debug)]
pub struct Station {
    pub id: StationIdentifier,
    pub name: Arc<str>,
    pub location: Option<GeoPoint>,
    /// Operating agency, when the feed reports one
    pub owner: Option<Arc<str>>,
}

impl LocatedEntity for Station {
    fn kind(&self) -> EntityKind {
        EntityKind::Station
    }

    fn identity(&self) -> &str {
        self.id.as_str()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// A navigation unit (lock, dock, marina, terminal...)
#[derive(Clone, Debug)]
pub struct NavUnit {
    pub id: NavUnitIdentifier,
    pub name: Arc<str>,
    pub location: Option<GeoPoint>,
    pub facility_type: Option<Arc<str>>,
}

impl LocatedEntity for NavUnit {
    fn kind(&self) -> EntityKind {
        EntityKind::NavUnit
    }

    fn identity(&self) -> &str {
        self.id.as_str()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// A named point on a user route
#[derive(Clone, Debug)]
pub struct RoutePoint {
    pub id: RoutePointIdentifier,
    pub name: Arc<str>,
    pub location: Option<GeoPoint>,
    /// Position within the owning route
    pub sequence: u32,
}

impl LocatedEntity for RoutePoint {
    fn kind(&self) -> EntityKind {
        EntityKind::RoutePoint
    }

    fn identity(&self) -> &str {
        self.id.as_str()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

// ============================================================================
// Entity Catalog
// ============================================================================

/// Immutable snapshot of located entities with spatial indexing
///
/// This type is cheap to clone since all entities are stored in `Arc`s.
/// A fresh bulk load builds a new catalog rather than mutating one.
#[derive(Clone)]
pub struct EntityCatalog {
    entities: Vec<Arc<dyn LocatedEntity>>,
    entity_map: HashMap<(EntityKind, Arc<str>), Arc<dyn LocatedEntity>>,
    entity_tree: RTree<EntityNode>,
}

impl EntityCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            entity_map: HashMap::new(),
            entity_tree: RTree::new(),
        }
    }

    /// Build a catalog from a bulk snapshot. Later duplicates of the same
    /// kind and identity replace earlier ones.
    pub fn from_entities(entities: Vec<Arc<dyn LocatedEntity>>) -> Self {
        let mut entity_map = HashMap::with_capacity(entities.len());
        for entity in &entities {
            entity_map.insert(
                (entity.kind(), Arc::<str>::from(entity.identity())),
                entity.clone(),
            );
        }

        let entities: Vec<Arc<dyn LocatedEntity>> = entities
            .into_iter()
            .filter(|entity| {
                entity_map
                    .get(&(entity.kind(), Arc::<str>::from(entity.identity())))
                    .is_some_and(|kept| Arc::ptr_eq(kept, entity))
            })
            .collect();

        let entity_tree = RTree::bulk_load(
            entities
                .iter()
                .filter_map(|entity| {
                    entity
                        .location()
                        .filter(GeoPoint::is_finite)
                        .map(|location| EntityNode::new(location, entity.clone()))
                })
                .collect(),
        );

        tracing::debug!(
            entities = entities.len(),
            located = entity_tree.size(),
            "built entity catalog"
        );

        Self {
            entities,
            entity_map,
            entity_tree,
        }
    }

    pub fn get(&self, kind: EntityKind, identity: &str) -> Option<Arc<dyn LocatedEntity>> {
        self.entity_map.get(&(kind, Arc::<str>::from(identity))).cloned()
    }

    pub fn require(&self, kind: EntityKind, identity: &str) -> Result<Arc<dyn LocatedEntity>> {
        self.get(kind, identity).ok_or_else(|| CoreError::EntityNotFound {
            kind,
            identity: identity.to_owned(),
        })
    }

    pub fn all(&self) -> &[Arc<dyn LocatedEntity>] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities whose great-circle distance to `point` is at most
    /// `radius_km`, in ranking order.
    pub fn entities_within(&self, point: GeoPoint, radius_km: f64) -> Vec<RankedEntity> {
        // Validate radius is positive
        if radius_km <= 0.0 || !radius_km.is_finite() || !point.is_finite() {
            return Vec::new();
        }

        let within = |node: &&EntityNode| distance_km(point, node.location) <= radius_km;
        let mut ranked: Vec<RankedEntity> = match search_envelope(point, radius_km) {
            Some(envelope) => self
                .entity_tree
                .locate_in_envelope(&envelope)
                .filter(within)
                .map(|node| RankedEntity::measure(node.entity.clone(), Some(point)))
                .collect(),
            None => self
                .entity_tree
                .iter()
                .filter(within)
                .map(|node| RankedEntity::measure(node.entity.clone(), Some(point)))
                .collect(),
        };

        sort_ranked(&mut ranked);
        ranked
    }

    /// The `n` located entities closest to `point` by great-circle distance.
    pub fn nearest(&self, point: GeoPoint, n: usize) -> Vec<RankedEntity> {
        if n == 0 || !point.is_finite() {
            return Vec::new();
        }

        // The planar nearest neighbours bound the search radius; the exact
        // answer is then the n closest inside that great-circle radius.
        let bound = self
            .entity_tree
            .nearest_neighbor_iter(&[point.longitude, point.latitude])
            .take(n)
            .map(|node| distance_km(point, node.location))
            .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))));

        let Some(radius_km) = bound else {
            return Vec::new();
        };

        let mut ranked = if radius_km > 0.0 {
            self.entities_within(point, radius_km)
        } else {
            // Every candidate sits exactly on the query point
            let mut exact: Vec<RankedEntity> = self
                .entity_tree
                .locate_all_at_point(&[point.longitude, point.latitude])
                .map(|node| RankedEntity::measure(node.entity.clone(), Some(point)))
                .collect();
            sort_ranked(&mut exact);
            exact
        };

        ranked.truncate(n);
        ranked
    }
}

impl Default for EntityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::queries::km_per_degree;

    fn station(id: &str, name: &str, location: Option<GeoPoint>) -> Arc<dyn LocatedEntity> {
        Arc::new(Station {
            id: StationIdentifier::new(id),
            name: name.into(),
            location,
            owner: Some("NDBC".into()),
        })
    }

    fn east_of(origin: GeoPoint, km: f64) -> GeoPoint {
        // Only exact at the equator, which is where these tests live
        GeoPoint::new(origin.latitude, origin.longitude + km / km_per_degree())
    }

    const ORIGIN: GeoPoint = GeoPoint::new(0.0, 10.0);

    fn sample() -> EntityCatalog {
        EntityCatalog::from_entities(vec![
            station("a", "Alpha", Some(east_of(ORIGIN, 5.0))),
            station("b", "Bravo", Some(east_of(ORIGIN, 15.0))),
            station("c", "Charlie", Some(east_of(ORIGIN, 40.0))),
            station("d", "Delta", None),
            Arc::new(NavUnit {
                id: NavUnitIdentifier::new("a"),
                name: "Alpha Marina".into(),
                location: Some(east_of(ORIGIN, 1.0)),
                facility_type: None,
            }),
        ])
    }

    fn names(ranked: &[RankedEntity]) -> Vec<&str> {
        ranked.iter().map(|r| r.display_name()).collect()
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = EntityCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.entities_within(ORIGIN, 100.0).is_empty());
        assert!(catalog.nearest(ORIGIN, 3).is_empty());
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = sample();

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(EntityKind::Station, "a").unwrap().display_name(), "Alpha");
        assert_eq!(
            catalog.get(EntityKind::NavUnit, "a").unwrap().display_name(),
            "Alpha Marina"
        );
        assert!(catalog.get(EntityKind::RoutePoint, "a").is_none());
        assert!(matches!(
            catalog.require(EntityKind::Station, "zzz"),
            Err(CoreError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_identity_keeps_latest() {
        let catalog = EntityCatalog::from_entities(vec![
            station("x", "Old", None),
            station("x", "New", None),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all()[0].display_name(), "New");
    }

    #[test]
    fn test_entities_within_radius() {
        let catalog = sample();

        let ranked = catalog.entities_within(ORIGIN, 20.0);
        assert_eq!(names(&ranked), vec!["Alpha Marina", "Alpha", "Bravo"]);

        assert!(catalog.entities_within(ORIGIN, 0.0).is_empty());
        assert!(catalog.entities_within(ORIGIN, f64::NAN).is_empty());
    }

    #[test]
    fn test_entities_within_full_scan_fallback() {
        // A huge radius cannot be expressed as one envelope
        let ranked = sample().entities_within(ORIGIN, 15_000.0);
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[3].display_name(), "Charlie");
    }

    #[test]
    fn test_nearest() {
        let catalog = sample();

        assert_eq!(names(&catalog.nearest(ORIGIN, 2)), vec!["Alpha Marina", "Alpha"]);
        assert_eq!(catalog.nearest(ORIGIN, 10).len(), 4); // Delta has no coordinates
        assert!(catalog.nearest(ORIGIN, 0).is_empty());
    }

    #[test]
    fn test_nearest_at_exact_point() {
        let here = GeoPoint::new(1.0, 1.0);
        let catalog = EntityCatalog::from_entities(vec![
            station("1", "Here B", Some(here)),
            station("2", "Here A", Some(here)),
            station("3", "Elsewhere", Some(GeoPoint::new(2.0, 2.0))),
        ]);

        assert_eq!(names(&catalog.nearest(here, 2)), vec!["Here A", "Here B"]);
    }
}
