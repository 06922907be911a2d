//! Cache Statistics Module
//!
//! Tracks cache activity: lookups, inserts and the different kinds of eviction.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries installed by try-insert or force-insert
    pub inserts: u64,
    /// Try-inserts rejected because the key was already resident
    pub duplicate_inserts: u64,
    /// Entries removed to make room for a new one
    pub capacity_evictions: u64,
    /// Entries removed by key, by tag or by a full clear
    pub invalidations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current number of live tag registrations
    pub total_tags: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Monotonic counters behind the snapshot.
///
/// Atomic so that lookups can be counted while holding only a shared lock.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    duplicate_inserts: AtomicU64,
    capacity_evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl StatsCounters {
    /// Creates a new set of counters, all at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_insert(&self) {
        self.duplicate_inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capacity_eviction(&self) {
        self.capacity_evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` removed entries to the invalidation counter.
    pub fn record_invalidations(&self, count: usize) {
        self.invalidations
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Builds a snapshot with the given residency figures.
    pub fn snapshot(&self, total_entries: usize, total_tags: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicate_inserts: self.duplicate_inserts.load(Ordering::Relaxed),
            capacity_evictions: self.capacity_evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            total_entries,
            total_tags,
        }
    }
}
