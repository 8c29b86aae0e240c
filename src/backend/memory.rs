//! In-memory product store
//!
//! Keeps documents in insertion order, which is also the order returned when
//! no sort (or an unknown sort field) is requested.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{BackendError, ProductBackend, UpdatedProduct};
use crate::models::{is_reserved_slug, slugify, ListQuery, Product, ProductInput, SortSpec};

/// Product store held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every input, as if created through the API.
    ///
    /// Returns the number of products inserted.
    pub async fn seed(&self, inputs: Vec<ProductInput>) -> Result<usize, BackendError> {
        let count = inputs.len();
        for input in inputs {
            self.create_product(input).await?;
        }
        info!("Seeded product store with {} products", count);
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductBackend for InMemoryProductStore {
    async fn list_products(&self, query: &ListQuery) -> Result<Vec<Product>, BackendError> {
        let products = self.products.read().await;

        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| matches_filter(p.category.as_deref(), query.category.as_deref()))
            .filter(|p| matches_filter(p.brand.as_deref(), query.brand.as_deref()))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            sort_products(&mut matched, sort);
        }

        Ok(matched
            .into_iter()
            .skip(query.skip())
            .take(query.limit)
            .collect())
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, BackendError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_product(&self, input: ProductInput) -> Result<Product, BackendError> {
        if let Some(message) = input.validate_new() {
            return Err(BackendError::Validation(message));
        }

        let title = input.title.unwrap_or_default().trim().to_string();
        let slug = match input.slug {
            Some(slug) => slug,
            None => slugify(&title),
        };
        if slug.is_empty() {
            return Err(BackendError::Validation(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }
        if is_reserved_slug(&slug) {
            return Err(BackendError::Validation(format!("Slug '{}' is reserved", slug)));
        }

        let mut products = self.products.write().await;
        if products.iter().any(|p| p.slug == slug) {
            return Err(BackendError::Conflict(format!("Slug '{}' already exists", slug)));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().simple().to_string(),
            title,
            slug,
            brand: input.brand,
            description: input.description,
            price: input.price.unwrap_or_default(),
            count_in_stock: input.count_in_stock.unwrap_or(0),
            images: input.images.unwrap_or_default(),
            rating: input.rating.unwrap_or(0.0),
            num_reviews: input.num_reviews.unwrap_or(0),
            category: input.category,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, slug = %product.slug, "product created");
        products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &str,
        input: ProductInput,
    ) -> Result<UpdatedProduct, BackendError> {
        if let Some(message) = input.validate_fields() {
            return Err(BackendError::Validation(message));
        }

        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(BackendError::NotFound)?;

        if let Some(slug) = &input.slug {
            if products.iter().any(|p| p.id != id && p.slug == *slug) {
                return Err(BackendError::Conflict(format!("Slug '{}' already exists", slug)));
            }
        }

        let product = &mut products[index];
        let previous_slug = product.slug.clone();

        if let Some(title) = input.title {
            product.title = title.trim().to_string();
        }
        if let Some(slug) = input.slug {
            product.slug = slug;
        }
        if let Some(brand) = input.brand {
            product.brand = Some(brand);
        }
        if let Some(description) = input.description {
            product.description = Some(description);
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(count) = input.count_in_stock {
            product.count_in_stock = count;
        }
        if let Some(images) = input.images {
            product.images = images;
        }
        if let Some(rating) = input.rating {
            product.rating = rating;
        }
        if let Some(num_reviews) = input.num_reviews {
            product.num_reviews = num_reviews;
        }
        if let Some(category) = input.category {
            product.category = Some(category);
        }
        product.updated_at = Utc::now();

        debug!(id, slug = %product.slug, "product updated");
        Ok(UpdatedProduct {
            previous_slug,
            product: product.clone(),
        })
    }

    async fn delete_product(&self, id: &str) -> Result<Product, BackendError> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(BackendError::NotFound)?;

        let product = products.remove(index);
        debug!(id, slug = %product.slug, "product deleted");
        Ok(product)
    }
}

/// Case-insensitive substring match. A missing filter matches everything,
/// a missing field matches nothing.
fn matches_filter(field: Option<&str>, filter: Option<&str>) -> bool {
    match (field, filter) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(value), Some(needle)) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Stable sort by a known field. Unknown fields leave insertion order.
fn sort_products(products: &mut [Product], sort: &SortSpec) {
    let compare: fn(&Product, &Product) -> Ordering = match sort.field.as_str() {
        "title" => |a: &Product, b: &Product| a.title.cmp(&b.title),
        "slug" => |a: &Product, b: &Product| a.slug.cmp(&b.slug),
        "brand" => |a: &Product, b: &Product| a.brand.cmp(&b.brand),
        "category" => |a: &Product, b: &Product| a.category.cmp(&b.category),
        "price" => |a: &Product, b: &Product| a.price.total_cmp(&b.price),
        "rating" => |a: &Product, b: &Product| a.rating.total_cmp(&b.rating),
        "numReviews" => |a: &Product, b: &Product| a.num_reviews.cmp(&b.num_reviews),
        "countInStock" => |a: &Product, b: &Product| a.count_in_stock.cmp(&b.count_in_stock),
        "createdAt" => |a: &Product, b: &Product| a.created_at.cmp(&b.created_at),
        "updatedAt" => |a: &Product, b: &Product| a.updated_at.cmp(&b.updated_at),
        _ => return,
    };

    if sort.descending {
        products.sort_by(|a, b| compare(b, a));
    } else {
        products.sort_by(compare);
    }
}
