//! Distance ranking of located entities.
//!
//! Produces a total order: ascending distance with unknown distances last,
//! ties broken by a case-insensitive collation of the display name (Unicode
//! Collation Algorithm, root locale), then exact display name, then identity,
//! then entity kind. The result does not depend on input order.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use feruca::Collator;

use crate::models::traits::LocatedEntity;
use crate::models::types::{Distance, GeoPoint};
use crate::spatial::queries::distance_km;

/// An entity paired with its distance from the user.
#[derive(Clone)]
pub struct RankedEntity {
    pub entity: Arc<dyn LocatedEntity>,
    pub distance: Distance,
}

impl RankedEntity {
    pub fn new(entity: Arc<dyn LocatedEntity>, distance: Distance) -> Self {
        Self { entity, distance }
    }

    /// Distance for `entity` as seen from `user_location`.
    pub fn measure(entity: Arc<dyn LocatedEntity>, user_location: Option<GeoPoint>) -> Self {
        let distance = match (user_location, entity.location()) {
            (Some(user), Some(location)) if user.is_finite() && location.is_finite() => {
                Distance::from_km(distance_km(user, location))
            }
            _ => Distance::Unknown,
        };

        Self { entity, distance }
    }

    pub fn display_name(&self) -> &str {
        self.entity.display_name()
    }

    pub fn identity(&self) -> &str {
        self.entity.identity()
    }
}

impl fmt::Debug for RankedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedEntity")
            .field("kind", &self.entity.kind())
            .field("identity", &self.entity.identity())
            .field("display_name", &self.entity.display_name())
            .field("distance", &self.distance)
            .finish()
    }
}

/// Rank `entities` by distance from `user_location`.
///
/// Without a user location every entity is `Distance::Unknown` and the
/// order falls back entirely to the name tie-break. Entities without
/// coordinates are kept, never dropped.
pub fn rank(entities: &[Arc<dyn LocatedEntity>], user_location: Option<GeoPoint>) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = entities
        .iter()
        .map(|entity| RankedEntity::measure(entity.clone(), user_location))
        .collect();

    sort_ranked(&mut ranked);
    ranked
}

/// Keep entries whose display name or identity contains `query`,
/// case-insensitively. Incoming order is preserved and an empty query keeps
/// everything. Any other query, whitespace included, is matched as given.
pub fn filter_by_query(ranked: Vec<RankedEntity>, query: &str) -> Vec<RankedEntity> {
    if query.is_empty() {
        return ranked;
    }

    let needle = query.to_lowercase();
    ranked
        .into_iter()
        .filter(|r| {
            r.display_name().to_lowercase().contains(&needle)
                || r.identity().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sort in place into ranking order.
pub fn sort_ranked(ranked: &mut Vec<RankedEntity>) {
    let mut collator = Collator::default();

    // Folded names are computed once per element, not once per comparison
    let mut keyed: Vec<(String, RankedEntity)> = ranked
        .drain(..)
        .map(|r| (r.display_name().to_lowercase(), r))
        .collect();
    keyed.sort_by(|(a_folded, a), (b_folded, b)| {
        compare_folded(&mut collator, (a, a_folded.as_str()), (b, b_folded.as_str()))
    });

    ranked.extend(keyed.into_iter().map(|(_, r)| r));
}

/// Ranking comparator for one pair. [`sort_ranked`] orders by the same rule.
pub fn compare_ranked(a: &RankedEntity, b: &RankedEntity) -> Ordering {
    compare_folded(
        &mut Collator::default(),
        (a, a.display_name().to_lowercase().as_str()),
        (b, b.display_name().to_lowercase().as_str()),
    )
}

// Case is folded before collation so only letters and accents separate names
// at this stage; exact name, identity and kind make the order total.
fn compare_folded(
    collator: &mut Collator,
    (a, a_folded): (&RankedEntity, &str),
    (b, b_folded): (&RankedEntity, &str),
) -> Ordering {
    a.distance
        .cmp(&b.distance)
        .then_with(|| collator.collate(a_folded, b_folded))
        .then_with(|| a.display_name().cmp(b.display_name()))
        .then_with(|| a.identity().cmp(b.identity()))
        .then_with(|| a.entity.kind().cmp(&b.entity.kind()))
}
