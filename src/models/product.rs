//! Product document and its create/update payload
//!
//! JSON field names follow the storefront client (`countInStock`, `numReviews`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Slugs taken by fixed routes under `/api/products/`.
pub const RESERVED_SLUGS: &[&str] = &["generate-seo"];

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    /// URL identifier, unique across the catalog
    pub slug: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/products` and `PUT /api/products/:id`.
///
/// Every field is optional so the same type serves partial updates. Creation
/// additionally requires `title` and `price`, see [`ProductInput::validate_new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub count_in_stock: Option<u32>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub num_reviews: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductInput {
    /// Validates a payload used to create a product.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate_new(&self) -> Option<String> {
        match self.title.as_deref().map(str::trim) {
            None | Some("") => return Some("Title is required".to_string()),
            Some(_) => {}
        }
        if self.price.is_none() {
            return Some("Price is required".to_string());
        }
        self.validate_fields()
    }

    /// Validates the fields present in a partial update.
    pub fn validate_fields(&self) -> Option<String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Some("Title cannot be empty".to_string());
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Some("Price must be a non-negative number".to_string());
            }
        }
        if let Some(rating) = self.rating {
            if !rating.is_finite() || rating < 0.0 {
                return Some("Rating must be a non-negative number".to_string());
            }
        }
        if let Some(slug) = &self.slug {
            if slugify(slug) != *slug {
                return Some(format!("Slug '{}' is not URL-safe", slug));
            }
            if is_reserved_slug(slug) {
                return Some(format!("Slug '{}' is reserved", slug));
            }
        }
        None
    }
}

/// True when `slug` would collide with a fixed route.
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Derives a URL slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-` and trims dashes from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
