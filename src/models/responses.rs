//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies other than products.

use serde::Serialize;

use crate::cache::CacheStats;

/// Plain `{"message": ...}` body, used for confirmations and errors.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned for unknown `/api/*` paths.
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundResponse {
    pub message: String,
    pub path: String,
}

impl NotFoundResponse {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            message: "API endpoint not found".to_string(),
            path: path.into(),
        }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_entries: usize,
    /// Capacity of the cache
    pub max_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Freshness window applied to every entry, in seconds
    pub ttl_seconds: u64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, max_entries: usize, ttl_seconds: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            invalidations: stats.invalidations,
            expirations: stats.expirations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            max_entries,
            hit_rate: stats.hit_rate(),
            ttl_seconds,
        }
    }
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse stamped with the current time
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
