//! # Rescue Instance Cache
//!
//! Building a [`Rescue`] squeezes SHAKE256 for every round constant and
//! inverts the MDS matrix, so callers that hash with several parameter sets
//! keep built instances in an LRU cache keyed by [`RescueParams`].
//!
//! The cache is deterministic: entries live in a `BTreeMap` and recency is a
//! logical clock (a monotonic counter), never wall time.
//!
//! This is a library facility for long-lived callers. The CLI runs one
//! command per process and builds its single instance directly.

use crate::error::{GoldilocksError, Result};
use crate::rescue::{Rescue, RescueParams};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Default maximum number of cached instances.
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// Default number of entries dropped per eviction.
pub const DEFAULT_EVICTION_BATCH: usize = 1;

// =============================================================================
// CACHE ENTRY
// =============================================================================

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    last_access: u64,
}

// =============================================================================
// LRU CACHE
// =============================================================================

/// Least-recently-used cache with a logical clock.
#[derive(Debug)]
pub struct LruCache<K: Ord + Clone, V: Clone> {
    entries: BTreeMap<K, CacheEntry<V>>,
    max_size: usize,
    eviction_batch: usize,
    logical_clock: u64,
    hits: u64,
    misses: u64,
}

impl<K: Ord + Clone, V: Clone> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl<K: Ord + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `max_size` entries (minimum 1).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_size: max_size.max(1),
            eviction_batch: DEFAULT_EVICTION_BATCH,
            logical_clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Evict `batch_size` entries at a time (minimum 1).
    #[must_use]
    pub fn with_eviction_batch(mut self, batch_size: usize) -> Self {
        self.eviction_batch = batch_size.max(1);
        self
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let timestamp = self.tick();

        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access = timestamp;
            self.hits = self.hits.saturating_add(1);
            Some(&entry.value)
        } else {
            self.misses = self.misses.saturating_add(1);
            None
        }
    }

    /// Look up `key` without touching recency or statistics.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Insert or replace `key`, evicting old entries when full.
    pub fn insert(&mut self, key: K, value: V) {
        let timestamp = self.tick();

        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict();
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_access: timestamp,
            },
        );
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Drop every entry. Statistics and the clock are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hits: self.hits,
            misses: self.misses,
            hit_rate_percent: self.hit_rate_percent(),
        }
    }

    /// Hit rate as an integer percentage (0-100).
    #[must_use]
    pub fn hit_rate_percent(&self) -> u8 {
        let total = self.hits.saturating_add(self.misses);
        if total == 0 {
            0
        } else {
            (self.hits.saturating_mul(100) / total) as u8
        }
    }

    fn tick(&mut self) -> u64 {
        self.logical_clock = self.logical_clock.saturating_add(1);
        self.logical_clock
    }

    /// Remove the `eviction_batch` least recently used entries.
    fn evict(&mut self) {
        let mut by_access: Vec<(u64, K)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_access, key.clone()))
            .collect();
        // Timestamps are unique, so this order is total
        by_access.sort_by_key(|(access, _)| *access);

        for (_, key) in by_access.into_iter().take(self.eviction_batch) {
            self.entries.remove(&key);
        }
    }
}

/// Cache performance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate_percent: u8,
}

// =============================================================================
// RESCUE CACHE
// =============================================================================

/// Built Rescue instances keyed by their parameters.
pub type RescueCache = LruCache<RescueParams, Rescue>;

impl LruCache<RescueParams, Rescue> {
    /// Return the cached instance for `params`, building it on a miss.
    ///
    /// A lookup counts once: a hit if the instance was cached, otherwise a
    /// miss (also when building fails).
    pub fn get_or_build(&mut self, params: RescueParams) -> Result<&Rescue> {
        if self.contains(&params) {
            return self
                .get(&params)
                .ok_or(GoldilocksError::InvalidParameters("instance missing from cache"));
        }

        self.misses = self.misses.saturating_add(1);
        let rescue = Rescue::new(params)?;
        self.insert(params, rescue);
        self.peek(&params)
            .ok_or(GoldilocksError::InvalidParameters("instance missing from cache"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
