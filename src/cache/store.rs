//! Cache Store Module
//!
//! Time-bounded key-value store with lazy expiry and explicit invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_MAX_ENTRIES};

// == Cache Store ==
/// In-memory cache whose entries expire a fixed TTL after they were stored.
///
/// Expired entries are treated as absent by every lookup. They are removed
/// by [`CacheStore::purge_expired`] and whenever a `set` needs room. The
/// store never holds more than `max_entries` entries: once full, expired
/// entries go first and then the entry stored longest ago.
///
/// Every invalidation advances a write epoch. A reader that records the
/// epoch before loading a value can store it with
/// [`CacheStore::set_if_current`], which refuses the value if a write
/// invalidated anything in between.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage, one entry per key
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: StatsCounters,
    /// Freshness window applied to every entry
    ttl_ms: u64,
    /// Maximum number of stored entries
    max_entries: usize,
    /// Number of invalidations performed so far
    epoch: u64,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: StatsCounters::new(),
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            max_entries: DEFAULT_MAX_ENTRIES,
            epoch: 0,
            clock,
        }
    }

    /// Caps the store at `max_entries` entries (at least one).
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    // == Get ==
    /// Returns the value stored under `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_fresh(key).map(|(value, _)| value)
    }

    /// Returns the fresh value under `key` with its remaining freshness in
    /// seconds (never 0 for a returned value).
    pub fn get_fresh(&self, key: &str) -> Option<(V, u64)> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                debug!(key, "cache hit");
                Some((entry.value.clone(), entry.remaining_secs(now)))
            }
            found => {
                self.stats.record_miss();
                debug!(key, expired = found.is_some(), "cache miss");
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its freshness window.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now_ms();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.make_room(now);
        }

        debug!(key = %key, "cache set");
        let entry = CacheEntry::new(value, now, self.ttl_ms);
        if let Some(previous) = self.entries.insert(key, entry) {
            if previous.is_expired_at(now) {
                self.stats.record_expirations(1);
            }
        }
    }

    /// Stores `value` only if no invalidation happened since `epoch` was
    /// read. Returns whether the value was stored.
    pub fn set_if_current(&mut self, key: impl Into<String>, value: V, epoch: u64) -> bool {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "cache set skipped after invalidation");
            return false;
        }
        self.set(key, value);
        true
    }

    /// Frees one slot, preferring expired entries over fresh ones.
    fn make_room(&mut self, now: u64) {
        if self.remove_expired(now) > 0 {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.stored_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, "cache full, evicted oldest entry");
        }
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.bump_epoch();
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            debug!(key, "cache invalidated");
        }
        removed
    }

    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        self.bump_epoch();
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();

        self.stats.record_invalidations(removed);
        debug!(prefix, removed, "cache prefix invalidated");
        removed
    }

    /// Removes every entry. Returns the number of entries removed.
    pub fn invalidate_all(&mut self) -> usize {
        self.bump_epoch();
        let removed = self.entries.len();
        self.entries.clear();

        self.stats.record_invalidations(removed);
        removed
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.remove_expired(now)
    }

    fn remove_expired(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        removed
    }
}

impl<V> CacheStore<V> {
    /// Freshness window applied to every entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Maximum number of stored entries.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Current write epoch, advanced by every invalidation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const TTL: Duration = Duration::from_secs(300);

    fn store_at(start_ms: u64) -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_ms));
        (CacheStore::with_clock(TTL, clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(TTL);
        assert!(store.is_empty());
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_at(0);

        store.set("key1", "value1".to_string());

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (store, _) = store_at(0);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_resets_stored_at() {
        let (mut store, clock) = store_at(0);

        store.set("key1", "value1".to_string());
        clock.advance(Duration::from_secs(200));
        store.set("key1", "value2".to_string());
        clock.advance(Duration::from_secs(200));

        // 400s after the first set, 200s after the second
        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_at(0);
        store.set("product_x", "v".to_string());

        clock.set_ms(299_000);
        assert_eq!(store.get("product_x").as_deref(), Some("v"));

        clock.set_ms(301_000);
        assert!(store.get("product_x").is_none());
        assert_eq!(store.len(), 1, "lookups never remove entries");
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_expires_exactly_at_ttl() {
        let (mut store, clock) = store_at(0);
        store.set("k", "v".to_string());

        clock.set_ms(299_999);
        assert!(store.get("k").is_some());
        clock.set_ms(300_000);
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_get_fresh_reports_remaining_seconds() {
        let (mut store, clock) = store_at(0);
        store.set("k", "v".to_string());

        assert_eq!(store.get_fresh("k"), Some(("v".to_string(), 300)));

        clock.advance(Duration::from_millis(120_500));
        assert_eq!(store.get_fresh("k"), Some(("v".to_string(), 180)));
    }

    #[test]
    fn test_store_invalidate() {
        let (mut store, _) = store_at(0);

        store.set("key1", "value1".to_string());
        assert!(store.invalidate("key1"));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_invalidate_absent_is_noop() {
        let (mut store, _) = store_at(0);
        store.set("other", "v".to_string());

        assert!(!store.invalidate("nonexistent"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().invalidations, 0);
    }

    #[test]
    fn test_store_invalidate_prefix() {
        let (mut store, _) = store_at(0);
        store.set("all_products", "a".to_string());
        store.set("all_products?page=2", "b".to_string());
        store.set("product_rolex-1", "c".to_string());

        assert_eq!(store.invalidate_prefix("all_products"), 2);
        assert!(store.get("all_products").is_none());
        assert!(store.get("all_products?page=2").is_none());
        assert_eq!(store.get("product_rolex-1").as_deref(), Some("c"));
    }

    #[test]
    fn test_store_invalidate_all() {
        let (mut store, _) = store_at(0);
        store.set("a", "1".to_string());
        store.set("b", "2".to_string());

        assert_eq!(store.invalidate_all(), 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_at(0);

        store.set("key1", "value1".to_string());
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_purge_expired() {
        let (mut store, clock) = store_at(0);

        store.set("key1", "value1".to_string());
        clock.advance(Duration::from_secs(200));
        store.set("key2", "value2".to_string());
        clock.advance(Duration::from_secs(150));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_set_if_current_refuses_after_invalidation() {
        let (mut store, _) = store_at(0);

        let epoch = store.epoch();
        // A write lands while the reader is loading its value
        store.invalidate_prefix("all_products");

        assert!(!store.set_if_current("all_products", "stale".to_string(), epoch));
        assert!(store.get("all_products").is_none());

        let epoch = store.epoch();
        assert!(store.set_if_current("all_products", "fresh".to_string(), epoch));
        assert_eq!(store.get("all_products").as_deref(), Some("fresh"));
    }

    #[test]
    fn test_invalidating_absent_key_still_advances_epoch() {
        let (mut store, _) = store_at(0);
        let epoch = store.epoch();

        assert!(!store.invalidate("product_x"));
        assert_ne!(store.epoch(), epoch);
    }

    #[test]
    fn test_set_never_exceeds_max_entries() {
        let (store, clock) = store_at(0);
        let mut store = store.with_max_entries(3);

        for i in 0..10 {
            store.set(format!("all_products?brand=b{}", i), i.to_string());
            assert!(store.len() <= 3);
            clock.advance(Duration::from_secs(1));
        }

        assert_eq!(store.stats().evictions, 7);
        // The three most recent entries survive
        assert_eq!(store.get("all_products?brand=b9").as_deref(), Some("9"));
        assert!(store.get("all_products?brand=b0").is_none());
    }

    #[test]
    fn test_set_reclaims_expired_entries_before_evicting() {
        let (store, clock) = store_at(0);
        let mut store = store.with_max_entries(100);

        for i in 0..100 {
            store.set(format!("all_products?brand=b{}", i), i.to_string());
        }
        store.set("product_x", "fresh".to_string());
        assert_eq!(store.stats().evictions, 1);

        clock.advance(Duration::from_secs(3600));
        store.set("all_products", "listing".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.stats().expirations, 100);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (store, _) = store_at(0);
        let mut store = store.with_max_entries(2);
        store.set("a", "1".to_string());
        store.set("b", "2".to_string());

        store.set("a", "3".to_string());

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }
}
