// Process-local, time-expiring result cache keyed by (category, query).
//
// There is no capacity bound and no background sweep: a stale entry is
// deleted by the read that discovers it. Reads and writes may come from
// concurrent request flows, so the map is a concurrent one.

use crate::offer::Offer;
use crate::query::SearchQuery;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CacheStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    expired_count: AtomicUsize,
    insert_count: AtomicUsize,
}

/// Point-in-time snapshot of cache counters, for operability only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub entries: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub expired_count: usize,
    pub insert_count: usize,
}

struct CacheEntry {
    stored_at: Instant,
    data: Vec<Offer>,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// TTL cache for aggregated result sets.
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            stats: CacheStats::default(),
        }
    }

    fn key(scope: &str, query: &SearchQuery) -> String {
        format!("{scope}:{}", query.cache_key())
    }

    /// Return the cached offers for `(scope, query)` when the entry is still
    /// fresh. A stale entry is evicted on this read and reported as a miss.
    pub fn get(&self, scope: &str, query: &SearchQuery) -> Option<Vec<Offer>> {
        let key = Self::key(scope, query);

        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_expired(self.ttl) {
                self.stats.hit_count.fetch_add(1, Ordering::Relaxed);
                return Some(entry.data.clone());
            }
        }

        // Stale or absent. Only remove when still stale, so a concurrent
        // fresh overwrite is not thrown away.
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(&key, |_, entry| entry.is_expired(ttl))
            .is_some()
        {
            self.stats.expired_count.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert or overwrite the entry for `(scope, query)`, timestamped now.
    pub fn set(&self, scope: &str, query: &SearchQuery, data: Vec<Offer>) {
        let key = Self::key(scope, query);
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                data,
            },
        );
        self.stats.insert_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Empty the cache unconditionally, returning how many entries dropped.
    pub fn clear(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            entries: self.entries.len(),
            hit_count: self.stats.hit_count.load(Ordering::Relaxed),
            miss_count: self.stats.miss_count.load(Ordering::Relaxed),
            expired_count: self.stats.expired_count.load(Ordering::Relaxed),
            insert_count: self.stats.insert_count.load(Ordering::Relaxed),
        }
    }
}
