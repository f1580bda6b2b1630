//! Runs favorite syncs through a [`SyncTransport`], gated by the coordinator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::identifiers::FavoriteKey;
use crate::models::types::CoreError;
use crate::network::traits::SyncTransport;
use crate::sync::SyncCoordinator;

#[derive(Debug)]
pub enum SyncOutcome {
    /// Refused by the coordinator (in flight or throttled)
    Skipped,
    Completed,
    /// The transport failed; the key is idle again
    Failed(CoreError),
}

impl SyncOutcome {
    pub fn ran(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

pub struct SyncDriver {
    coordinator: Arc<SyncCoordinator>,
    transport: Arc<dyn SyncTransport>,
    throttle_window: Duration,
}

impl SyncDriver {
    pub fn new(
        coordinator: Arc<SyncCoordinator>,
        transport: Arc<dyn SyncTransport>,
        throttle_window: Duration,
    ) -> Self {
        Self {
            coordinator,
            transport,
            throttle_window,
        }
    }

    pub fn coordinator(&self) -> &Arc<SyncCoordinator> {
        &self.coordinator
    }

    pub fn throttle_window(&self) -> Duration {
        self.throttle_window
    }

    pub async fn request_sync(&self, key: FavoriteKey, is_favorite: bool) -> SyncOutcome {
        self.request_sync_at(key, is_favorite, Instant::now()).await
    }

    /// Push the favorite state of `key` unless the coordinator refuses.
    ///
    /// Transport errors are logged and returned, never propagated further;
    /// the key goes back to idle on every path, including cancellation.
    pub async fn request_sync_at(
        &self,
        key: FavoriteKey,
        is_favorite: bool,
        now: Instant,
    ) -> SyncOutcome {
        let Some(permit) = self.coordinator.try_begin(&key, now, self.throttle_window) else {
            debug!(%key, "favorite sync skipped");
            return SyncOutcome::Skipped;
        };

        info!(%key, is_favorite, "starting favorite sync");
        let result = self.transport.push(permit.key(), is_favorite).await;
        drop(permit);

        match result {
            Ok(()) => {
                info!(%key, "favorite sync finished");
                SyncOutcome::Completed
            }
            Err(error) => {
                warn!(%key, %error, "favorite sync failed");
                SyncOutcome::Failed(error)
            }
        }
    }
}
