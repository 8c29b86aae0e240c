//! Cache Entry Module
//!
//! Defines a single cached value together with its freshness window.

// == Cache Entry ==
/// A cached value with the time it was stored and how long it stays fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, kept verbatim
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Freshness window in milliseconds
    pub ttl_ms: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stored at `now_ms` that stays fresh for `ttl_ms`.
    pub fn new(value: V, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now_ms`.
    ///
    /// An entry is fresh while `now - stored_at < ttl`, so it expires exactly
    /// when the full TTL has elapsed. A clock reading earlier than `stored_at`
    /// counts as zero elapsed time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) >= self.ttl_ms
    }

    // == Time To Live ==
    /// Returns the remaining freshness in milliseconds (0 once expired).
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.ttl_ms
            .saturating_sub(now_ms.saturating_sub(self.stored_at))
    }

    /// Returns the remaining freshness in whole seconds, rounded up.
    ///
    /// Rounding up keeps a fresh entry from advertising `max-age=0`.
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.remaining_ms(now_ms).div_ceil(1000)
    }
}
