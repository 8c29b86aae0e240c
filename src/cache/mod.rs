//! Cache Module
//!
//! Process-local read-through cache for catalog reads, with a fixed TTL,
//! lazy expiry, a capacity bound and explicit invalidation.
//!
//! Each process owns its own cache. A write handled by one worker does not
//! invalidate entries held by another, so across a multi-process deployment
//! staleness is bounded by the TTL rather than by the write.

mod clock;
mod entry;
pub mod keys;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{list_key, product_key, ALL_PRODUCTS_KEY};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default freshness window of a cached read
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default capacity of a cache store
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Cache shared between concurrent request handlers.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;
