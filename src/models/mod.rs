//! Domain types and DTOs for the catalog API
//!
//! Products, list queries and the serialized response bodies.

pub mod product;
pub mod query;
pub mod responses;

// Re-export commonly used types
pub use product::{is_reserved_slug, slugify, Product, ProductInput, RESERVED_SLUGS};
pub use query::{ListParams, ListQuery, SortSpec, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use responses::{HealthResponse, MessageResponse, NotFoundResponse, StatsResponse};
