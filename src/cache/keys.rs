//! Cache Key Module
//!
//! Derives cache keys from the logical identity of a catalog read.
//!
//! The unfiltered first page lives under [`ALL_PRODUCTS_KEY`]. Any other list
//! query gets its own key carrying the normalized query signature, so a
//! filtered or paginated result can never be served for a different query.
//! All list keys share the [`ALL_PRODUCTS_KEY`] prefix and are invalidated
//! together.

use crate::models::{ListQuery, DEFAULT_LIMIT, DEFAULT_PAGE};

/// Key of the default product listing, and prefix of every list key.
pub const ALL_PRODUCTS_KEY: &str = "all_products";

/// Prefix of single-product keys.
pub const PRODUCT_KEY_PREFIX: &str = "product_";

// == List Key ==
/// Returns the cache key for a product listing.
///
/// Parameters are emitted in a fixed order and filter values are lowercased,
/// matching the case-insensitive filter semantics.
pub fn list_key(query: &ListQuery) -> String {
    if query.is_default() {
        return ALL_PRODUCTS_KEY.to_string();
    }

    let mut parts = Vec::with_capacity(5);
    if let Some(brand) = &query.brand {
        parts.push(format!("brand={}", escape(&brand.to_lowercase())));
    }
    if let Some(category) = &query.category {
        parts.push(format!("category={}", escape(&category.to_lowercase())));
    }
    if query.limit != DEFAULT_LIMIT {
        parts.push(format!("limit={}", query.limit));
    }
    if query.page != DEFAULT_PAGE {
        parts.push(format!("page={}", query.page));
    }
    if let Some(sort) = &query.sort {
        parts.push(format!("sort={}", escape(&sort.as_param())));
    }

    format!("{}?{}", ALL_PRODUCTS_KEY, parts.join("&"))
}

/// Escapes the separators so a filter value cannot forge another parameter.
fn escape(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

// == Product Key ==
/// Returns the cache key for a single product looked up by slug.
pub fn product_key(slug: &str) -> String {
    format!("{}{}", PRODUCT_KEY_PREFIX, slug)
}
