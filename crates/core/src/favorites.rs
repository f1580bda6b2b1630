//! Ranked, searchable view over the user's favorites.
//!
//! Pure composition of [`rank`] and [`filter_by_query`]: no caching and no
//! interaction with sync state, so it can run on every keystroke.

use std::sync::Arc;

use crate::models::traits::LocatedEntity;
use crate::models::types::GeoPoint;
use crate::network::traits::FavoriteStore;
use crate::ranking::{filter_by_query, rank, RankedEntity};

pub fn project(
    all_favorites: &[Arc<dyn LocatedEntity>],
    user_location: Option<GeoPoint>,
    query: &str,
) -> Vec<RankedEntity> {
    filter_by_query(rank(all_favorites, user_location), query)
}

/// The subset of `candidates` currently favorited in `store`.
pub fn select_favorites(
    candidates: &[Arc<dyn LocatedEntity>],
    store: &dyn FavoriteStore,
) -> Vec<Arc<dyn LocatedEntity>> {
    candidates
        .iter()
        .filter(|entity| store.contains(&entity.favorite_key()))
        .cloned()
        .collect()
}

/// [`select_favorites`] followed by [`project`].
pub fn project_from_store(
    candidates: &[Arc<dyn LocatedEntity>],
    store: &dyn FavoriteStore,
    user_location: Option<GeoPoint>,
    query: &str,
) -> Vec<RankedEntity> {
    project(&select_favorites(candidates, store), user_location, query)
}
