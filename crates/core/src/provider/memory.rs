//! In-memory implementations of the platform boundaries.
//!
//! Used by the mobile session for its local view of favorites and location,
//! and by tests.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::identifiers::FavoriteKey;
use crate::models::types::{GeoPoint, Result};
use crate::network::traits::{FavoriteStore, LocationProvider};

#[derive(Debug, Default)]
pub struct MemoryFavoriteStore {
    keys: RwLock<HashSet<FavoriteKey>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: impl IntoIterator<Item = FavoriteKey>) -> Self {
        Self {
            keys: RwLock::new(keys.into_iter().collect()),
        }
    }

    /// Flip the favorite state of `key`, returning the new state.
    pub fn toggle(&self, key: &FavoriteKey) -> bool {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        if keys.remove(key) {
            false
        } else {
            keys.insert(key.clone());
            true
        }
    }

    /// Replace the whole set, e.g. after restoring from persistent storage.
    pub fn replace_all(&self, keys: impl IntoIterator<Item = FavoriteKey>) {
        *self.keys.write().unwrap_or_else(PoisonError::into_inner) = keys.into_iter().collect();
    }
}

impl FavoriteStore for MemoryFavoriteStore {
    fn add(&self, key: &FavoriteKey) -> Result<()> {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        Ok(())
    }

    fn remove(&self, key: &FavoriteKey) -> Result<()> {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn contains(&self, key: &FavoriteKey) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn list(&self) -> Vec<FavoriteKey> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

/// Holds the most recent fix pushed in by the platform's location service.
#[derive(Debug, Default)]
pub struct LatestLocation {
    fix: RwLock<Option<GeoPoint>>,
}

impl LatestLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new fix. Non-finite coordinates clear the fix instead.
    pub fn update(&self, fix: Option<GeoPoint>) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) =
            fix.filter(GeoPoint::is_finite);
    }
}

impl LocationProvider for LatestLocation {
    fn current_location(&self) -> Option<GeoPoint> {
        *self.fix.read().unwrap_or_else(PoisonError::into_inner)
    }
}
