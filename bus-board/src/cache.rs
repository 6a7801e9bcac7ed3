//! Freshness cache for upstream results.
//!
//! One entry per stop key, stamped with a monotonic capture time. Two
//! independent read policies run against that single timestamp:
//! [`FreshnessCache::get`] answers "fresh enough to skip the upstream?",
//! [`FreshnessCache::get_stale`] answers "still usable if the upstream is
//! down?".
//!
//! The key space is the fixed set of configured stops, so there is no
//! capacity bound and no time-based eviction. Entries are only ever
//! replaced wholesale or cleared.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;

/// A monotonic time source.
///
/// Readings are offsets from an arbitrary fixed origin; only differences
/// between readings are meaningful.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Production clock backed by [`Instant`], immune to wall-clock changes.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ManualClock {
    now: Arc<std::sync::Mutex<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age at which an entry still counts as fresh (inclusive).
    pub fresh_ttl: Duration,

    /// Maximum age at which an entry may still be served as stale (inclusive).
    /// Expected to be at least `fresh_ttl`, but not enforced.
    pub stale_max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fresh_ttl: Duration::from_secs(20),
            stale_max_age: Duration::from_secs(300),
        }
    }
}

/// What the cache actually stores.
struct Stored<V> {
    value: Arc<V>,
    stored_at: Duration,
}

// Manual impl: cloning shares the Arc, so `V` itself need not be `Clone`.
impl<V> Clone for Stored<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            stored_at: self.stored_at,
        }
    }
}

/// A cache read that passed its age check.
#[derive(Debug)]
pub struct CacheHit<V> {
    /// The stored value.
    pub value: Arc<V>,

    /// Age of the entry at the moment it was read.
    pub age: Duration,
}

/// Keyed store with fresh and stale read policies.
pub struct FreshnessCache<V> {
    entries: MokaCache<String, Stored<V>>,
    clock: Arc<dyn Clock>,
    fresh_ttl: Duration,
    stale_max_age: Duration,
}

impl<V: Send + Sync + 'static> FreshnessCache<V> {
    /// Create a cache on the system monotonic clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Create a cache reading time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: MokaCache::builder().build(),
            clock,
            fresh_ttl: config.fresh_ttl,
            stale_max_age: config.stale_max_age,
        }
    }

    /// Store `value` under `key`, stamped with the current time.
    ///
    /// Replaces any existing entry, value and timestamp together.
    pub async fn set(&self, key: impl Into<String>, value: Arc<V>) {
        let stored = Stored {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key.into(), stored).await;
    }

    /// Get the entry if its age is at most the fresh TTL.
    pub async fn get(&self, key: &str) -> Option<CacheHit<V>> {
        self.read(key, self.fresh_ttl).await
    }

    /// Get the entry if its age is at most the stale max age.
    pub async fn get_stale(&self, key: &str) -> Option<CacheHit<V>> {
        self.read(key, self.stale_max_age).await
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    async fn read(&self, key: &str, max_age: Duration) -> Option<CacheHit<V>> {
        let stored = self.entries.get(key).await?;
        let age = self.clock.now().saturating_sub(stored.stored_at);
        if age > max_age {
            return None;
        }
        Some(CacheHit {
            value: stored.value,
            age,
        })
    }
}
