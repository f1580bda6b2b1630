//! Per-key gating of background favorite synchronization.
//!
//! Each [`FavoriteKey`] moves through `Idle -> InFlight -> Idle`. A sync may
//! start only when the key is idle and its throttle window (measured from
//! the previous *start*) has elapsed. The check and the transition happen
//! under one lock, so concurrent callers for the same key can never both
//! be admitted.

pub mod driver;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::identifiers::FavoriteKey;

pub use driver::{SyncDriver, SyncOutcome};

/// Snapshot of one key's sync bookkeeping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncState {
    /// When the most recent sync for this key was started
    pub last_sync_time: Option<Instant>,
    pub in_flight: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    InFlight,
}

/// Process-wide sync state, keyed by favorite.
///
/// Entries are created on first use and kept for the life of the
/// coordinator; their number is bounded by the number of favorites.
#[derive(Debug, Default)]
pub struct SyncCoordinator {
    states: Mutex<HashMap<FavoriteKey, SyncState>>,
}

impl SyncCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    // The map has no multi-step invariants, so a panic elsewhere while the
    // lock was held leaves nothing to repair.
    fn lock(&self) -> MutexGuard<'_, HashMap<FavoriteKey, SyncState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether a sync for `key` may start at `now`.
    ///
    /// Returns `false` while a sync for the key is in flight, or while `now`
    /// is within `throttle_window` of the last start. Otherwise records the
    /// start (`last_sync_time = now`, in flight) and returns `true`.
    /// Refused calls are not queued.
    pub fn should_sync(&self, key: &FavoriteKey, now: Instant, throttle_window: Duration) -> bool {
        let mut states = self.lock();
        let state = states.entry(key.clone()).or_default();

        if state.in_flight {
            debug!(%key, "sync already in flight");
            return false;
        }

        if let Some(last) = state.last_sync_time {
            // A clock reading earlier than the last start counts as inside the window
            let elapsed = now.checked_duration_since(last).unwrap_or(Duration::ZERO);
            if elapsed < throttle_window {
                debug!(%key, ?elapsed, ?throttle_window, "sync throttled");
                return false;
            }
        }

        state.last_sync_time = Some(now);
        state.in_flight = true;
        true
    }

    /// Mark the sync for `key` finished, whether it succeeded or failed.
    pub fn complete_sync(&self, key: &FavoriteKey) {
        if let Some(state) = self.lock().get_mut(key) {
            state.in_flight = false;
        }
    }

    /// [`should_sync`](Self::should_sync) returning a guard that completes
    /// the sync when dropped.
    pub fn try_begin(
        self: &Arc<Self>,
        key: &FavoriteKey,
        now: Instant,
        throttle_window: Duration,
    ) -> Option<SyncPermit> {
        self.should_sync(key, now, throttle_window).then(|| SyncPermit {
            coordinator: Arc::clone(self),
            key: key.clone(),
        })
    }

    pub fn state(&self, key: &FavoriteKey) -> Option<SyncState> {
        self.lock().get(key).copied()
    }

    pub fn phase(&self, key: &FavoriteKey) -> SyncPhase {
        match self.state(key) {
            Some(SyncState { in_flight: true, .. }) => SyncPhase::InFlight,
            _ => SyncPhase::Idle,
        }
    }

    /// Number of keys seen so far
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }
}

/// An admitted sync. Dropping it calls
/// [`complete_sync`](SyncCoordinator::complete_sync), including when the
/// future holding it is cancelled.
#[must_use = "dropping the permit immediately ends the sync"]
#[derive(Debug)]
pub struct SyncPermit {
    coordinator: Arc<SyncCoordinator>,
    key: FavoriteKey,
}

impl SyncPermit {
    pub fn key(&self) -> &FavoriteKey {
        &self.key
    }
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.coordinator.complete_sync(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    const WINDOW: Duration = Duration::from_secs(30);

    fn key(s: &str) -> FavoriteKey {
        FavoriteKey::new(s)
    }

    #[test]
    fn test_first_call_admits_and_marks_in_flight() {
        let coordinator = SyncCoordinator::new();
        let k = key("station:41001");
        let t0 = Instant::now();

        assert_eq!(coordinator.state(&k), None);
        assert!(coordinator.should_sync(&k, t0, WINDOW));
        assert_eq!(
            coordinator.state(&k),
            Some(SyncState {
                last_sync_time: Some(t0),
                in_flight: true
            })
        );
        assert_eq!(coordinator.phase(&k), SyncPhase::InFlight);
    }

    #[test]
    fn test_in_flight_blocks_even_after_window() {
        let coordinator = SyncCoordinator::new();
        let k = key("station:41001");
        let t0 = Instant::now();

        assert!(coordinator.should_sync(&k, t0, WINDOW));
        assert!(!coordinator.should_sync(&k, t0, WINDOW));
        assert!(!coordinator.should_sync(&k, t0 + WINDOW * 2, WINDOW));
    }

    #[test]
    fn test_throttle_window() {
        let coordinator = SyncCoordinator::new();
        let k = key("nav_unit:lock-7");
        let t0 = Instant::now();

        assert!(coordinator.should_sync(&k, t0, WINDOW));
        coordinator.complete_sync(&k);

        assert!(!coordinator.should_sync(&k, t0, WINDOW));
        assert!(!coordinator.should_sync(&k, t0 + Duration::from_secs(1), WINDOW));
        assert!(!coordinator.should_sync(&k, t0 + WINDOW - Duration::from_millis(1), WINDOW));

        // Refused calls do not move the window
        assert!(coordinator.should_sync(&k, t0 + WINDOW, WINDOW));
        assert_eq!(coordinator.state(&k).unwrap().last_sync_time, Some(t0 + WINDOW));
    }

    #[test]
    fn test_window_measured_from_start_not_completion() {
        let coordinator = SyncCoordinator::new();
        let k = key("station:44013");
        let t0 = Instant::now();

        assert!(coordinator.should_sync(&k, t0, WINDOW));
        // Sync runs long and finishes well after the window has elapsed
        coordinator.complete_sync(&k);

        assert!(coordinator.should_sync(&k, t0 + WINDOW + Duration::from_secs(5), WINDOW));
    }

    #[test]
    fn test_clock_before_last_start_is_throttled() {
        let coordinator = SyncCoordinator::new();
        let k = key("station:1");
        let t0 = Instant::now() + Duration::from_secs(60);

        assert!(coordinator.should_sync(&k, t0, WINDOW));
        coordinator.complete_sync(&k);
        assert!(!coordinator.should_sync(&k, t0 - Duration::from_secs(10), WINDOW));
    }

    #[test]
    fn test_zero_window_only_dedups() {
        let coordinator = SyncCoordinator::new();
        let k = key("station:1");
        let t0 = Instant::now();

        assert!(coordinator.should_sync(&k, t0, Duration::ZERO));
        assert!(!coordinator.should_sync(&k, t0, Duration::ZERO));
        coordinator.complete_sync(&k);
        assert!(coordinator.should_sync(&k, t0, Duration::ZERO));
    }

    #[test]
    fn test_keys_are_independent() {
        let coordinator = SyncCoordinator::new();
        let t0 = Instant::now();

        assert!(coordinator.should_sync(&key("a"), t0, WINDOW));
        assert!(coordinator.should_sync(&key("b"), t0, WINDOW));
        assert_eq!(coordinator.tracked_keys(), 2);
    }

    #[test]
    fn test_complete_unknown_key_is_noop() {
        let coordinator = SyncCoordinator::new();
        coordinator.complete_sync(&key("never-seen"));
        assert_eq!(coordinator.tracked_keys(), 0);
        assert_eq!(coordinator.phase(&key("never-seen")), SyncPhase::Idle);
    }

    #[test]
    fn test_concurrent_callers_admit_exactly_one() {
        const CALLERS: usize = 16;

        let coordinator = SyncCoordinator::new();
        let k = key("station:contended");
        let now = Instant::now();
        let barrier = Barrier::new(CALLERS);

        let admitted = thread::scope(|scope| {
            let handles: Vec<_> = (0..CALLERS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        coordinator.should_sync(&k, now, WINDOW)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|admitted| *admitted)
                .count()
        });

        assert_eq!(admitted, 1);
    }

    #[test]
    fn test_permit_releases_on_drop() {
        let coordinator = Arc::new(SyncCoordinator::new());
        let k = key("station:41001");
        let t0 = Instant::now();

        let permit = coordinator.try_begin(&k, t0, Duration::ZERO).unwrap();
        assert_eq!(permit.key(), &k);
        assert!(coordinator.try_begin(&k, t0, Duration::ZERO).is_none());

        drop(permit);
        assert_eq!(coordinator.phase(&k), SyncPhase::Idle);
        assert!(coordinator.try_begin(&k, t0, Duration::ZERO).is_some());
    }

    #[test]
    fn test_permit_releases_on_panic() {
        let coordinator = Arc::new(SyncCoordinator::new());
        let k = key("station:41001");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _permit = coordinator.try_begin(&k, Instant::now(), WINDOW).unwrap();
            panic!("transport blew up");
        }));

        assert!(result.is_err());
        assert_eq!(coordinator.phase(&k), SyncPhase::Idle);
    }
}
