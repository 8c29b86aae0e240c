//! Catalog Cache - product catalog service with a read-through cache
//!
//! Serves product listings and lookups from a TTL-bounded in-memory cache
//! that is invalidated whenever a product is written.

pub mod api;
pub mod backend;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use catalog::CatalogService;
pub use config::Config;
pub use tasks::spawn_sweeper_task;
