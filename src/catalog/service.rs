//! Catalog Service
//!
//! Read-through product reads and cache-invalidating writes.
//!
//! Reads check the cache under the shared lock and fall through to the
//! backend on a miss, storing whatever the backend returned. The cache lock
//! is never held across a backend call, so two concurrent misses for one key
//! both query the backend and the later store wins. A miss records the
//! cache's write epoch and the loaded value is only stored if no write
//! invalidated anything while the backend was being read.
//!
//! Writes go to the backend first and invalidate the affected keys only after
//! the backend succeeded. Backend errors are returned unchanged and leave the
//! cache untouched.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::backend::{ProductBackend, UpdatedProduct};
use crate::cache::{list_key, product_key, CacheStore, SharedCache, ALL_PRODUCTS_KEY};
use crate::error::{CatalogError, Result};
use crate::models::{ListQuery, Product, ProductInput};

// == Cached Value ==
/// Payloads stored in the product cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Products(Vec<Product>),
    Product(Box<Product>),
}

/// Cache of catalog reads.
pub type ProductCache = CacheStore<CachedValue>;

// == Cached Read ==
/// A read result together with how long downstream caches may keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    /// Remaining freshness in seconds, 0 when the value could not be cached
    pub max_age: u64,
    /// Whether the value came from the cache
    pub hit: bool,
}

impl<T> Cached<T> {
    /// Value of the `Cache-Control` header for this read.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.max_age)
    }
}

// == Catalog Service ==
/// Product reads and writes routed through the cache.
#[derive(Clone)]
pub struct CatalogService {
    cache: SharedCache<CachedValue>,
    backend: Arc<dyn ProductBackend>,
}

impl CatalogService {
    /// Creates a service over an existing cache and backend.
    pub fn new(cache: ProductCache, backend: Arc<dyn ProductBackend>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            backend,
        }
    }

    /// Shared handle to the cache, for statistics and the sweeper.
    pub fn cache(&self) -> SharedCache<CachedValue> {
        self.cache.clone()
    }

    // == Reads ==
    /// Lists products, answering from the cache when possible.
    pub async fn list_products(&self, query: &ListQuery) -> Result<Cached<Vec<Product>>> {
        let key = list_key(query);

        let epoch = match self.lookup(&key).await {
            Ok((CachedValue::Products(products), max_age)) => {
                return Ok(Cached {
                    value: products,
                    max_age,
                    hit: true,
                });
            }
            Ok(_) => self.cache.read().await.epoch(),
            Err(epoch) => epoch,
        };

        let products = self.backend.list_products(query).await?;
        debug!(key = %key, count = products.len(), "listing loaded from backend");

        let max_age = self
            .store(key, CachedValue::Products(products.clone()), epoch)
            .await;
        Ok(Cached {
            value: products,
            max_age,
            hit: false,
        })
    }

    /// Fetches one product by slug, answering from the cache when possible.
    ///
    /// A missing product is reported as [`CatalogError::NotFound`] and is not
    /// cached.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Cached<Product>> {
        let key = product_key(slug);

        let epoch = match self.lookup(&key).await {
            Ok((CachedValue::Product(product), max_age)) => {
                return Ok(Cached {
                    value: *product,
                    max_age,
                    hit: true,
                });
            }
            Ok(_) => self.cache.read().await.epoch(),
            Err(epoch) => epoch,
        };

        let product = self
            .backend
            .product_by_slug(slug)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let max_age = self
            .store(key, CachedValue::Product(Box::new(product.clone())), epoch)
            .await;
        Ok(Cached {
            value: product,
            max_age,
            hit: false,
        })
    }

    // == Writes ==
    /// Creates a product and invalidates every listing.
    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let product = self.backend.create_product(input).await?;

        let removed = self.cache.write().await.invalidate_prefix(ALL_PRODUCTS_KEY);
        info!(slug = %product.slug, removed, "product created, listings invalidated");
        Ok(product)
    }

    /// Updates a product and invalidates every listing plus its old and new
    /// slug keys.
    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let updated = self.backend.update_product(id, input).await?;
        self.invalidate_updated(&updated).await;
        Ok(updated.product)
    }

    /// Deletes a product and invalidates every listing plus its slug key.
    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        let product = self.backend.delete_product(id).await?;

        let removed = {
            let mut cache = self.cache.write().await;
            let lists = cache.invalidate_prefix(ALL_PRODUCTS_KEY);
            lists + usize::from(cache.invalidate(&product_key(&product.slug)))
        };
        info!(slug = %product.slug, removed, "product deleted, cache invalidated");
        Ok(product)
    }

    // == Helpers ==
    /// Returns the fresh entry under `key`, or the write epoch observed on
    /// a miss.
    async fn lookup(&self, key: &str) -> std::result::Result<(CachedValue, u64), u64> {
        let cache = self.cache.read().await;
        cache.get_fresh(key).ok_or_else(|| cache.epoch())
    }

    /// Stores `value` unless a write happened since `epoch`, and returns the
    /// freshness window it may be kept for downstream.
    async fn store(&self, key: String, value: CachedValue, epoch: u64) -> u64 {
        let mut cache = self.cache.write().await;
        if cache.set_if_current(key, value, epoch) {
            cache.ttl().as_secs()
        } else {
            0
        }
    }

    async fn invalidate_updated(&self, updated: &UpdatedProduct) {
        let slug = &updated.product.slug;
        let mut cache = self.cache.write().await;

        let mut removed = cache.invalidate_prefix(ALL_PRODUCTS_KEY);
        removed += usize::from(cache.invalidate(&product_key(slug)));
        if updated.renamed() {
            removed += usize::from(cache.invalidate(&product_key(&updated.previous_slug)));
        }

        info!(
            slug = %slug,
            previous_slug = %updated.previous_slug,
            removed,
            "product updated, cache invalidated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::backend::{default_catalog, BackendError, InMemoryProductStore};
    use crate::cache::{ManualClock, DEFAULT_TTL};
    use crate::models::SortSpec;

    /// Backend wrapper counting lookups and optionally failing or pausing
    /// listings.
    #[derive(Default)]
    struct CountingBackend {
        inner: InMemoryProductStore,
        lookups: AtomicUsize,
        fail_reads: AtomicBool,
        hold_listings: AtomicBool,
        listing_entered: Notify,
        listing_release: Notify,
    }

    impl CountingBackend {
        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        fn set_failing(&self, failing: bool) {
            self.fail_reads.store(failing, Ordering::SeqCst);
        }

        fn read_guard(&self) -> std::result::Result<(), BackendError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                Err(BackendError::Unavailable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProductBackend for CountingBackend {
        async fn list_products(
            &self,
            query: &ListQuery,
        ) -> std::result::Result<Vec<Product>, BackendError> {
            self.read_guard()?;
            let products = self.inner.list_products(query).await;
            if self.hold_listings.load(Ordering::SeqCst) {
                self.listing_entered.notify_one();
                self.listing_release.notified().await;
            }
            products
        }

        async fn product_by_slug(
            &self,
            slug: &str,
        ) -> std::result::Result<Option<Product>, BackendError> {
            self.read_guard()?;
            self.inner.product_by_slug(slug).await
        }

        async fn create_product(
            &self,
            input: ProductInput,
        ) -> std::result::Result<Product, BackendError> {
            self.inner.create_product(input).await
        }

        async fn update_product(
            &self,
            id: &str,
            input: ProductInput,
        ) -> std::result::Result<UpdatedProduct, BackendError> {
            self.inner.update_product(id, input).await
        }

        async fn delete_product(&self, id: &str) -> std::result::Result<Product, BackendError> {
            self.inner.delete_product(id).await
        }
    }

    async fn service() -> (CatalogService, Arc<CountingBackend>, Arc<ManualClock>) {
        let backend = Arc::new(CountingBackend::default());
        backend.inner.seed(default_catalog()).await.unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let cache = ProductCache::with_clock(DEFAULT_TTL, clock.clone());
        (
            CatalogService::new(cache, backend.clone()),
            backend,
            clock,
        )
    }

    #[tokio::test]
    async fn test_cold_list_then_hit() {
        let (service, backend, _) = service().await;

        let first = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(!first.hit);
        assert_eq!(first.value.len(), 8);
        assert_eq!(first.cache_control(), "public, max-age=300");

        let second = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(second.hit);
        assert_eq!(second.value, first.value);
        assert_eq!(backend.lookups(), 1);
    }

    #[tokio::test]
    async fn test_hit_reports_remaining_freshness() {
        let (service, _, clock) = service().await;

        service.product_by_slug("casino-royale-watch").await.unwrap();
        clock.advance(Duration::from_secs(100));

        let cached = service.product_by_slug("casino-royale-watch").await.unwrap();
        assert!(cached.hit);
        assert_eq!(cached.max_age, 200);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let (service, backend, clock) = service().await;

        service.product_by_slug("casino-royale-watch").await.unwrap();
        clock.advance(Duration::from_secs(299));
        assert!(service.product_by_slug("casino-royale-watch").await.unwrap().hit);

        clock.advance(Duration::from_secs(2));
        assert!(!service.product_by_slug("casino-royale-watch").await.unwrap().hit);
        assert_eq!(backend.lookups(), 2);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_cached() {
        let (service, backend, _) = service().await;

        for _ in 0..2 {
            let result = service.product_by_slug("no-such-watch").await;
            assert!(matches!(result, Err(CatalogError::NotFound)));
        }
        assert_eq!(backend.lookups(), 2);
        assert!(service.cache().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_uncached() {
        let (service, backend, _) = service().await;

        backend.set_failing(true);
        let result = service.list_products(&ListQuery::default()).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
        assert!(service.cache().read().await.is_empty());

        backend.set_failing(false);
        let recovered = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(!recovered.hit);
        assert_eq!(recovered.value.len(), 8);
    }

    #[tokio::test]
    async fn test_filtered_listings_do_not_share_entries() {
        let (service, _, _) = service().await;

        let all = service.list_products(&ListQuery::default()).await.unwrap();
        let rolex = service
            .list_products(&ListQuery {
                brand: Some("rolex".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let page_two = service
            .list_products(&ListQuery {
                page: 2,
                limit: 3,
                sort: SortSpec::parse("price"),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(all.value.len(), 8);
        assert!(!rolex.hit, "a filtered query must not reuse the default listing");
        assert_eq!(rolex.value.len(), 1);
        assert!(!page_two.hit);
        assert_eq!(page_two.value.len(), 3);
    }

    #[tokio::test]
    async fn test_create_invalidates_all_listings() {
        let (service, _, _) = service().await;

        service.list_products(&ListQuery::default()).await.unwrap();
        service
            .list_products(&ListQuery {
                category: Some("men".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        service.product_by_slug("casino-royale-watch").await.unwrap();

        service
            .create_product(ProductInput {
                title: Some("Orient Bambino".to_string()),
                price: Some(1800.0),
                category: Some("Men".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let all = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(!all.hit);
        assert_eq!(all.value.len(), 9);

        // Single-product entries are untouched by a create
        assert!(service.product_by_slug("casino-royale-watch").await.unwrap().hit);
    }

    #[tokio::test]
    async fn test_update_invalidates_product_and_listings() {
        let (service, _, _) = service().await;

        let before = service.product_by_slug("rolex-quartz-luxury-timepiece").await.unwrap();
        service.list_products(&ListQuery::default()).await.unwrap();

        service
            .update_product(
                &before.value.id,
                ProductInput {
                    price: Some(9900.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = service.product_by_slug("rolex-quartz-luxury-timepiece").await.unwrap();
        assert!(!after.hit, "update must force a fresh backend read");
        assert_eq!(after.value.price, 9900.0);
        assert!(!service.list_products(&ListQuery::default()).await.unwrap().hit);
    }

    #[tokio::test]
    async fn test_rename_invalidates_old_and_new_slug() {
        let (service, _, _) = service().await;

        let original = service.product_by_slug("seastar-dynamic-orbit").await.unwrap();
        // Stale entry under the new slug, left over from an earlier product
        service.cache().write().await.set(
            product_key("seastar-orbit"),
            CachedValue::Product(Box::new(original.value.clone())),
        );

        service
            .update_product(
                &original.value.id,
                ProductInput {
                    slug: Some("seastar-orbit".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let old = service.product_by_slug("seastar-dynamic-orbit").await;
        assert!(matches!(old, Err(CatalogError::NotFound)));

        let renamed = service.product_by_slug("seastar-orbit").await.unwrap();
        assert!(!renamed.hit);
        assert_eq!(renamed.value.slug, "seastar-orbit");
    }

    #[tokio::test]
    async fn test_delete_invalidates_product() {
        let (service, _, _) = service().await;

        let product = service.product_by_slug("forrad-classic-black").await.unwrap();
        service.delete_product(&product.value.id).await.unwrap();

        let result = service.product_by_slug("forrad-classic-black").await;
        assert!(matches!(result, Err(CatalogError::NotFound)));
        assert_eq!(
            service.list_products(&ListQuery::default()).await.unwrap().value.len(),
            7
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let (service, _, _) = service().await;

        service.list_products(&ListQuery::default()).await.unwrap();
        let result = service.delete_product("missing-id").await;
        assert!(matches!(result, Err(CatalogError::NotFound)));

        assert!(service.list_products(&ListQuery::default()).await.unwrap().hit);
    }

    #[tokio::test]
    async fn test_concurrent_misses_store_a_complete_value() {
        let (service, backend, _) = service().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.list_products(&ListQuery::default()).await })
            })
            .collect();

        for handle in handles {
            let listed = handle.await.unwrap().unwrap();
            assert_eq!(listed.value.len(), 8);
        }

        assert!(backend.lookups() >= 1);
        let cached = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(cached.hit);
        assert_eq!(cached.value.len(), 8);
    }

    #[tokio::test]
    async fn test_read_racing_a_write_does_not_cache_stale_listing() {
        let (service, backend, _) = service().await;

        backend.hold_listings.store(true, Ordering::SeqCst);
        let reader = {
            let service = service.clone();
            tokio::spawn(async move { service.list_products(&ListQuery::default()).await })
        };

        // The reader has loaded the old listing and is paused before storing it
        backend.listing_entered.notified().await;
        backend.hold_listings.store(false, Ordering::SeqCst);
        service
            .create_product(ProductInput {
                title: Some("Orient Bambino".to_string()),
                price: Some(1800.0),
                ..Default::default()
            })
            .await
            .unwrap();
        backend.listing_release.notify_one();

        let raced = reader.await.unwrap().unwrap();
        assert_eq!(raced.value.len(), 8);
        assert_eq!(raced.max_age, 0);

        let after = service.list_products(&ListQuery::default()).await.unwrap();
        assert!(!after.hit, "the pre-write listing must not be served");
        assert_eq!(after.value.len(), 9);
        assert!(service.list_products(&ListQuery::default()).await.unwrap().hit);
    }

    #[tokio::test]
    async fn test_read_racing_an_update_does_not_cache_stale_product() {
        let (service, _, _) = service().await;
        let product = service.product_by_slug("citizen-regal-gold").await.unwrap().value;

        // A miss observes the epoch, then a write lands before the store
        let epoch = service.cache().read().await.epoch();
        service
            .update_product(
                &product.id,
                ProductInput {
                    price: Some(1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let max_age = service
            .store(
                product_key("citizen-regal-gold"),
                CachedValue::Product(Box::new(product)),
                epoch,
            )
            .await;
        assert_eq!(max_age, 0);

        let fresh = service.product_by_slug("citizen-regal-gold").await.unwrap();
        assert!(!fresh.hit);
        assert_eq!(fresh.value.price, 1.0);
    }
}
