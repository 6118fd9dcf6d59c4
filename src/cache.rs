use crate::FastMap;
use std::time::{Duration, Instant};

/// Monotonic time source for cache expiry. Injected so expiry behavior is
/// testable without waiting on the wall clock.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], anchored at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Duration,
}

/// Key-value store with a per-entry time-to-live, checked lazily on read.
/// An expired entry simply stops being returned; it is dropped when the
/// key is written again or removed.
#[derive(Debug)]
pub struct TtlCache<V, C: Clock = SystemClock> {
    entries: FastMap<String, CacheEntry<V>>,
    clock: C,
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::default())
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C: Clock> TtlCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: FastMap::default(),
            clock,
        }
    }

    /// Returns the cached value for `key` if it has not expired yet.
    pub fn get(&self, key: &str) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if self.clock.now() < entry.expires_at {
            Some(&entry.value)
        } else {
            None
        }
    }

    /// Stores `value` for `ttl` from now, replacing any previous entry
    /// under the same key.
    pub fn put(&mut self, key: String, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Drops the entry under `key`, returning its value even if expired.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
