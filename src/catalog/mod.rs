//! Catalog Module
//!
//! Product reads and writes with the read-through cache in front of the
//! backend.

pub mod seo;
mod service;

pub use seo::{generate_seo, SeoMetadata, SeoRequest};
pub use service::{Cached, CachedValue, CatalogService, ProductCache};
