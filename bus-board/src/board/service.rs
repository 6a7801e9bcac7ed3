//! Per-stop pipeline and board aggregation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::FreshnessCache;
use crate::domain::{Board, BoardItem, ErrorCode, ErrorDetail, ItemState, StopConfig};
use crate::mbta::MbtaError;
use crate::selection::{DEFAULT_MAX_ALTERNATIVES, select_arrivals};

use super::fetch::{FetchedCandidates, TransitClient, fetch_candidates};

/// Produces boards for the configured stops.
///
/// Owns the upstream client and the cache; constructed once at startup and
/// shared by all request handlers.
pub struct BoardService<C> {
    stops: Vec<StopConfig>,
    client: C,
    cache: FreshnessCache<FetchedCandidates>,
    max_alternatives: usize,
}

impl<C: TransitClient> BoardService<C> {
    /// Create a service over `stops`, in the order they should be shown.
    pub fn new(
        stops: Vec<StopConfig>,
        client: C,
        cache: FreshnessCache<FetchedCandidates>,
    ) -> Self {
        Self {
            stops,
            client,
            cache,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }

    /// Set how many alternatives to show after the next arrival.
    pub fn with_max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }

    /// The configured stops.
    pub fn stops(&self) -> &[StopConfig] {
        &self.stops
    }

    /// Access the upstream client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Access the cache.
    pub fn cache(&self) -> &FreshnessCache<FetchedCandidates> {
        &self.cache
    }

    /// Build the board for every configured stop as of `now`.
    ///
    /// Stops are processed concurrently and returned in configured order.
    pub async fn get_board(&self, now: DateTime<Utc>) -> Board {
        let items = join_all(self.stops.iter().map(|stop| self.board_item(stop, now))).await;
        Board { as_of: now, items }
    }

    /// Look up a configured stop by key.
    pub fn stop(&self, key: &str) -> Option<&StopConfig> {
        self.stops.iter().find(|stop| stop.key == key)
    }

    /// Build the board item for one stop, or `None` if no stop has `key`.
    pub async fn get_board_item(&self, key: &str, now: DateTime<Utc>) -> Option<BoardItem> {
        let stop = self.stop(key)?;
        Some(self.board_item(stop, now).await)
    }

    async fn board_item(&self, stop: &StopConfig, now: DateTime<Utc>) -> BoardItem {
        BoardItem {
            stop: stop.clone(),
            state: self.item_state(stop, now).await,
        }
    }

    async fn item_state(&self, stop: &StopConfig, now: DateTime<Utc>) -> ItemState {
        if let Some(hit) = self.cache.get(&stop.key).await {
            debug!(key = %stop.key, age_ms = hit.age.as_millis() as u64, "fresh cache hit");
            return self.build(stop, &hit.value, now);
        }

        match fetch_candidates(&self.client, stop).await {
            Ok(fetched) => {
                let fetched = Arc::new(fetched);
                self.cache.set(stop.key.clone(), Arc::clone(&fetched)).await;
                self.build(stop, &fetched, now)
            }
            Err(err) => {
                warn!(key = %stop.key, error = %err, "MBTA fetch failed");
                self.degrade(stop, &err, now).await
            }
        }
    }

    /// Recover from a failed fetch with whatever the cache still allows.
    async fn degrade(&self, stop: &StopConfig, err: &MbtaError, now: DateTime<Utc>) -> ItemState {
        let Some(hit) = self.cache.get_stale(&stop.key).await else {
            return ItemState::Error(ErrorDetail {
                code: error_code(err),
                message: err.to_string(),
            });
        };

        let age = TimeDelta::from_std(hit.age).unwrap_or(TimeDelta::zero());
        let captured_at = now - age;
        info!(key = %stop.key, age_secs = hit.age.as_secs(), "serving stale data");

        // Replayed against `now`, so buses that have since left drop out and
        // the result may be no_service rather than stale.
        self.build(stop, &hit.value, now).into_stale(captured_at)
    }

    fn build(&self, stop: &StopConfig, fetched: &FetchedCandidates, now: DateTime<Utc>) -> ItemState {
        let (next, alternatives) = select_arrivals(
            &fetched.candidates,
            now,
            stop.walk_minutes,
            fetched.source,
            self.max_alternatives,
        );
        ItemState::from_selection(next, alternatives)
    }
}

/// Map an upstream failure to the code reported for the stop.
fn error_code(err: &MbtaError) -> ErrorCode {
    if err.is_rate_limited() {
        ErrorCode::MbtaRateLimited
    } else {
        ErrorCode::MbtaUnreachable
    }
}
