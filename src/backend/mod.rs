//! Product Backend Module
//!
//! The document store the catalog cache sits in front of.
//!
//! # Implementations
//! - [`InMemoryProductStore`]: process-local store, optionally seeded with the
//!   default catalog

mod memory;
mod seed;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ListQuery, Product, ProductInput};

pub use memory::InMemoryProductStore;
pub use seed::default_catalog;

// == Backend Error ==
/// Failures raised by a product backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// No product matched the lookup
    #[error("Product not found")]
    NotFound,

    /// The payload was rejected
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique field (the slug) is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result of an update, carrying the slug the product had before it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedProduct {
    pub previous_slug: String,
    pub product: Product,
}

impl UpdatedProduct {
    /// True when the update changed the product's slug.
    pub fn renamed(&self) -> bool {
        self.previous_slug != self.product.slug
    }
}

// == Product Backend ==
/// Lookup and mutation interface of the product store.
#[async_trait]
pub trait ProductBackend: Send + Sync {
    /// Returns one page of products matching the query's filters, in its sort order.
    async fn list_products(&self, query: &ListQuery) -> Result<Vec<Product>, BackendError>;

    /// Looks a product up by slug. Absence is `Ok(None)`, not an error.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError>;

    /// Creates a product, deriving its slug from the title when none is given.
    async fn create_product(&self, input: ProductInput) -> Result<Product, BackendError>;

    /// Applies the fields present in `input` to the product with `id`.
    async fn update_product(
        &self,
        id: &str,
        input: ProductInput,
    ) -> Result<UpdatedProduct, BackendError>;

    /// Deletes the product with `id`, returning it as it was.
    async fn delete_product(&self, id: &str) -> Result<Product, BackendError>;
}
