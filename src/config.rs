//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Freshness window of cached catalog reads, in seconds
    pub cache_ttl: u64,
    /// Maximum number of cached reads
    pub max_entries: usize,
    /// Interval of the expired-entry sweeper in seconds, 0 disables it
    pub sweep_interval: u64,
    /// Bearer token required on write routes, None leaves them open
    pub admin_token: Option<String>,
    /// Origins allowed by CORS, empty allows any origin
    pub cors_origins: Vec<String>,
    /// Load the default catalog into the store at startup
    pub seed_products: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `MAX_ENTRIES` - Maximum cached reads (default: 1000)
    /// - `SWEEP_INTERVAL` - Sweeper frequency in seconds, 0 disables (default: 60)
    /// - `ADMIN_TOKEN` - Bearer token for write routes (default: unset)
    /// - `CLIENT_URL` - Comma-separated allowed CORS origins (default: any)
    /// - `SEED_PRODUCTS` - Seed the default catalog (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            max_entries: parse_var("MAX_ENTRIES")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.max_entries),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            admin_token: env::var("ADMIN_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            cors_origins: env::var("CLIENT_URL")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            seed_products: parse_var("SEED_PRODUCTS").unwrap_or(defaults.seed_products),
        }
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            cache_ttl: 300,
            max_entries: 1000,
            sweep_interval: 60,
            admin_token: None,
            cors_origins: Vec::new(),
            seed_products: true,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated origin list, dropping blanks and duplicates.
fn parse_origins(raw: &str) -> Vec<String> {
    let mut origins: Vec<String> = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}
