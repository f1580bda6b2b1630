use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use mariner_core::{
    CoreConfig, CoreError, EntityCatalog, EntityKind, FavoriteKey, FavoriteStore, GeoPoint,
    LatestLocation, LocationProvider, MemoryFavoriteStore, RankedEntity, SyncCoordinator,
    SyncDriver, SyncTransport, project, project_from_store, rank,
};
use tokio::runtime::Runtime;

use crate::{
    error::MarinerError,
    logging::setup_logging,
    records::{FfiEntity, FfiEntityKind, FfiGeoPoint, FfiRankedEntity, ranked_to_ffi},
};

/// Implemented by the platform layer to push favorite state to the cloud.
///
/// Called on a background thread; blocking is fine.
#[uniffi::export(with_foreign)]
pub trait FavoriteSyncTransport: Send + Sync {
    fn push_favorite(&self, key: String, is_favorite: bool) -> Result<(), MarinerError>;
}

struct ForeignTransport {
    inner: Arc<dyn FavoriteSyncTransport>,
}

impl SyncTransport for ForeignTransport {
    fn push<'a>(
        &'a self,
        key: &'a FavoriteKey,
        is_favorite: bool,
    ) -> Pin<Box<dyn Future<Output = mariner_core::Result<()>> + Send + 'a>> {
        let inner = Arc::clone(&self.inner);
        let call_key = key.to_string();

        Box::pin(async move {
            let result =
                tokio::task::spawn_blocking(move || inner.push_favorite(call_key, is_favorite))
                    .await;

            let message = match result {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(error)) => error.to_string(),
                Err(join_error) => join_error.to_string(),
            };

            Err(CoreError::Transport {
                key: key.clone(),
                message,
            })
        })
    }
}

fn parse_config(json: &str) -> Result<CoreConfig, MarinerError> {
    serde_json::from_str(json).map_err(|e| MarinerError::Config(e.to_string()))
}

/// Everything the favorites and route screens need from the core.
///
/// Owns the sync runtime, the latest entity snapshot, the local favorite
/// set and the latest location fix. No global state: each session is
/// independent.
#[derive(uniffi::Object)]
pub struct MarinerSession {
    runtime: Runtime,
    config: CoreConfig,
    catalog: RwLock<Arc<EntityCatalog>>,
    favorites: MemoryFavoriteStore,
    location: LatestLocation,
    driver: Arc<SyncDriver>,
}

impl MarinerSession {
    fn catalog(&self) -> Arc<EntityCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn favorite_key(kind: FfiEntityKind, identity: &str) -> FavoriteKey {
        FavoriteKey::for_entity(kind.into(), identity)
    }
}

#[uniffi::export]
impl MarinerSession {
    /// `config_json` may omit any field; `None` uses defaults.
    #[uniffi::constructor]
    pub fn new(
        config_json: Option<String>,
        transport: Arc<dyn FavoriteSyncTransport>,
    ) -> Result<Self, MarinerError> {
        setup_logging();

        let config = match config_json.as_deref() {
            Some(json) => parse_config(json)?,
            None => CoreConfig::default(),
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mariner-sync")
            .enable_all()
            .build()
            .map_err(|e| MarinerError::Runtime(e.to_string()))?;

        let driver = Arc::new(SyncDriver::new(
            Arc::new(SyncCoordinator::new()),
            Arc::new(ForeignTransport { inner: transport }),
            config.sync_throttle(),
        ));

        tracing::info!(?config, "mariner session started");

        Ok(Self {
            runtime,
            config,
            catalog: RwLock::new(Arc::new(EntityCatalog::new())),
            favorites: MemoryFavoriteStore::new(),
            location: LatestLocation::new(),
            driver,
        })
    }

    pub fn update_location(&self, location: Option<FfiGeoPoint>) {
        self.location.update(location.map(GeoPoint::from));
    }

    pub fn current_location(&self) -> Option<FfiGeoPoint> {
        self.location.current_location().map(FfiGeoPoint::from)
    }

    /// Replace the entity snapshot (stations, nav units, route points).
    pub fn load_entities(&self, entities: Vec<FfiEntity>) {
        let catalog = EntityCatalog::from_entities(
            entities.into_iter().map(FfiEntity::into_entity).collect(),
        );
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    /// Every loaded entity, ranked from the current location and filtered by `query`.
    pub fn rank_entities(&self, query: String) -> Vec<FfiRankedEntity> {
        let catalog = self.catalog();
        ranked_to_ffi(&project(
            catalog.all(),
            self.location.current_location(),
            &query,
        ))
    }

    /// Closest entities to the current location. Without a fix this is the
    /// first page of the name-ordered list.
    pub fn nearest_entities(&self) -> Vec<FfiRankedEntity> {
        let catalog = self.catalog();
        let limit = self.config.nearest_limit;

        let ranked = match self.location.current_location() {
            Some(here) => catalog.nearest(here, limit),
            None => {
                let mut all = rank(catalog.all(), None);
                all.truncate(limit);
                all
            }
        };

        ranked_to_ffi(&ranked)
    }

    /// One entity with its distance from the current location.
    pub fn entity_details(
        &self,
        kind: FfiEntityKind,
        identity: String,
    ) -> Result<FfiRankedEntity, MarinerError> {
        let entity = self.catalog().require(EntityKind::from(kind), &identity)?;
        let ranked = RankedEntity::measure(entity, self.location.current_location());
        Ok(FfiRankedEntity::from(&ranked))
    }

    pub fn entities_within(&self, radius_km: f64) -> Vec<FfiRankedEntity> {
        match self.location.current_location() {
            Some(here) => ranked_to_ffi(&self.catalog().entities_within(here, radius_km)),
            None => Vec::new(),
        }
    }

    /// Favorited entities, ranked from the current location and filtered by `query`.
    pub fn project_favorites(&self, query: String) -> Vec<FfiRankedEntity> {
        let catalog = self.catalog();
        ranked_to_ffi(&project_from_store(
            catalog.all(),
            &self.favorites,
            self.location.current_location(),
            &query,
        ))
    }

    /// Flip an entity's favorite state and request a background sync for it.
    /// Returns the new state.
    pub fn toggle_favorite(&self, kind: FfiEntityKind, identity: String) -> bool {
        let key = Self::favorite_key(kind, &identity);
        let is_favorite = self.favorites.toggle(&key);

        let driver = Arc::clone(&self.driver);
        self.runtime.spawn(async move {
            driver.request_sync(key, is_favorite).await;
        });

        is_favorite
    }

    pub fn is_favorite(&self, kind: FfiEntityKind, identity: String) -> bool {
        self.favorites.contains(&Self::favorite_key(kind, &identity))
    }

    pub fn favorite_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .favorites
            .list()
            .into_iter()
            .map(|k| k.to_string())
            .collect();
        keys.sort();
        keys
    }

    /// Seed the local favorite set from the platform's persistent store.
    /// Does not trigger any sync.
    pub fn restore_favorites(&self, keys: Vec<String>) {
        self.favorites
            .replace_all(keys.into_iter().map(FavoriteKey::from));
    }

    /// For shells that run their own sync: may a sync for `key` start now?
    /// Every `true` must be paired with a later [`Self::complete_sync`].
    pub fn should_sync(&self, key: String) -> bool {
        self.driver.coordinator().should_sync(
            &FavoriteKey::from(key),
            Instant::now(),
            self.config.sync_throttle(),
        )
    }

    pub fn complete_sync(&self, key: String) {
        self.driver.coordinator().complete_sync(&FavoriteKey::from(key));
    }
}
