//! Bounded-staleness snapshot of the remote catalog.
//!
//! [`SnapshotCache::get_snapshot`] returns the held snapshot while it is
//! younger than the TTL and otherwise re-crawls the source page by page.
//! Refreshes are single-flight: callers that find the snapshot expired while
//! another refresh is running wait for it and take its outcome instead of
//! issuing their own fetch sequence.

mod clock;
mod snapshot;

use core::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use partmatch_core::DomainError;
use partmatch_inventory::InventoryItem;

use crate::catalog::{CatalogSource, FetchError};

pub use clock::{Clock, ManualClock, SystemClock};
pub use snapshot::CatalogSnapshot;

/// What to hand out when a refresh fails.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Serve the previous snapshot if there is one.
    #[default]
    ServeStale,
    /// Always surface the fetch error.
    Fail,
}

impl StalePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServeStale => "serve_stale",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for StalePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serve_stale" => Ok(Self::ServeStale),
            "fail" => Ok(Self::Fail),
            other => Err(DomainError::malformed(format!(
                "unknown stale policy {other:?} (expected serve_stale or fail)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: TimeDelta,
    pub page_size: u32,
    /// Upper bound on pages per refresh.
    pub max_pages: u32,
    /// Per-page deadline; an elapsed deadline is a failed page fetch.
    pub fetch_timeout: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: TimeDelta::seconds(300),
            page_size: 100,
            max_pages: 20,
            fetch_timeout: Duration::from_secs(10),
            stale_policy: StalePolicy::ServeStale,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<Arc<CatalogSnapshot>>,
    /// Invalidation generation the held snapshot was crawled under.
    snapshot_generation: u64,
    /// Bumped by every invalidation.
    generation: u64,
    /// Completed refresh attempts, successful or not.
    attempts: u64,
    last_error: Option<FetchError>,
}

impl CacheState {
    /// The held snapshot, if no invalidation happened since its crawl started.
    fn current_generation(&self) -> Option<&Arc<CatalogSnapshot>> {
        self.snapshot
            .as_ref()
            .filter(|_| self.snapshot_generation == self.generation)
    }

    fn fresh(&self, now: chrono::DateTime<chrono::Utc>) -> Option<Arc<CatalogSnapshot>> {
        self.current_generation().filter(|s| s.is_fresh_at(now)).cloned()
    }
}

/// What a failed refresh hands back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum OnFailure {
    /// Apply the configured [`StalePolicy`].
    Policy,
    /// Always surface the error.
    Surface,
}

pub struct SnapshotCache<S> {
    source: S,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    state: Mutex<CacheState>,
    refresh: tokio::sync::Mutex<()>,
}

impl<S> core::fmt::Debug for SnapshotCache<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S: CatalogSource> SnapshotCache<S> {
    pub fn new(source: S, settings: CacheSettings) -> Self {
        Self::with_clock(source, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            settings,
            state: Mutex::new(CacheState::default()),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The held snapshot, fresh or not, without touching the source.
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.lock_state().snapshot.clone()
    }

    /// Force the next [`get_snapshot`](Self::get_snapshot) to refresh.
    ///
    /// A refresh already running when this is called does not count: its
    /// result is held but not treated as fresh. The held snapshot stays
    /// available as the stale fallback.
    pub fn invalidate(&self) {
        self.lock_state().generation += 1;
    }

    /// Current catalog, refreshing it first if it is older than the TTL.
    pub async fn get_snapshot(&self) -> Result<Arc<CatalogSnapshot>, FetchError> {
        let observed = {
            let state = self.lock_state();
            if let Some(fresh) = state.fresh(self.clock.now()) {
                return Ok(fresh);
            }
            state.attempts
        };

        let _refresh = self.refresh.lock().await;

        {
            let state = self.lock_state();
            if let Some(fresh) = state.fresh(self.clock.now()) {
                return Ok(fresh);
            }
            // A refresh finished while we waited for the lock: share its outcome.
            if state.attempts != observed {
                match (&state.last_error, state.current_generation()) {
                    (None, Some(snapshot)) => return Ok(Arc::clone(snapshot)),
                    (Some(err), _) => return self.fallback(&state, err.clone()),
                    (None, None) => {}
                }
            }
        }

        self.refresh_locked(OnFailure::Policy).await
    }

    /// Invalidate and crawl the source now, whatever the snapshot's age.
    ///
    /// Failure is returned as-is regardless of [`StalePolicy`]; the held
    /// snapshot is kept.
    pub async fn refresh_now(&self) -> Result<Arc<CatalogSnapshot>, FetchError> {
        self.invalidate();
        let _refresh = self.refresh.lock().await;
        self.refresh_locked(OnFailure::Surface).await
    }

    async fn refresh_locked(&self, on_failure: OnFailure) -> Result<Arc<CatalogSnapshot>, FetchError> {
        let generation = self.lock_state().generation;
        let captured_at = self.clock.now();
        let started = Instant::now();
        info!(
            page_size = self.settings.page_size,
            max_pages = self.settings.max_pages,
            "catalog.refresh.started"
        );

        let outcome = self.fetch_all().await;
        let mut state = self.lock_state();
        state.attempts += 1;

        match outcome {
            Ok((items, pages)) => {
                let snapshot = Arc::new(CatalogSnapshot::new(items, captured_at, self.settings.ttl, pages));
                info!(
                    pages,
                    items = snapshot.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    superseded = state.generation != generation,
                    "catalog.refresh.completed"
                );
                state.snapshot = Some(Arc::clone(&snapshot));
                state.snapshot_generation = generation;
                state.last_error = None;
                Ok(snapshot)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "catalog.refresh.failed"
                );
                state.last_error = Some(err.clone());
                match on_failure {
                    OnFailure::Policy => self.fallback(&state, err),
                    OnFailure::Surface => Err(err),
                }
            }
        }
    }

    async fn fetch_all(&self) -> Result<(Vec<InventoryItem>, u32), FetchError> {
        let page_size = self.settings.page_size;
        let mut items = Vec::new();
        let mut pages = 0;

        for page in 1..=self.settings.max_pages {
            let batch = tokio::time::timeout(self.settings.fetch_timeout, self.source.fetch_page(page, page_size))
                .await
                .map_err(|_| FetchError::Timeout { page })??;
            pages = page;

            let last = batch.len() < page_size as usize;
            items.extend(batch);
            if last {
                return Ok((items, pages));
            }
        }

        warn!(
            max_pages = self.settings.max_pages,
            items = items.len(),
            "catalog.refresh.max_pages_reached"
        );
        Ok((items, pages))
    }

    fn fallback(&self, state: &CacheState, err: FetchError) -> Result<Arc<CatalogSnapshot>, FetchError> {
        match (self.settings.stale_policy, &state.snapshot) {
            (StalePolicy::ServeStale, Some(stale)) => {
                warn!(
                    error = %err,
                    captured_at = %stale.captured_at(),
                    items = stale.len(),
                    "catalog.snapshot.stale_served"
                );
                Ok(Arc::clone(stale))
            }
            _ => Err(err),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
