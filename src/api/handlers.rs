//! API Handlers
//!
//! HTTP request handlers for the catalog endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::auth::AdminGuard;
use crate::backend::ProductBackend;
use crate::catalog::{generate_seo, Cached, CatalogService, ProductCache, SeoMetadata, SeoRequest};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{
    HealthResponse, ListParams, ListQuery, MessageResponse, NotFoundResponse, ProductInput,
    StatsResponse,
};

/// Header reporting whether a read was answered from the cache.
pub const X_CACHE: &str = "x-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached catalog
    pub catalog: CatalogService,
    /// Bearer token required on write routes
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new AppState with open write routes.
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            admin_token: None,
        }
    }

    /// Requires `token` on write routes.
    pub fn with_admin_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache with the configured TTL and capacity in front of
    /// `backend`.
    pub fn from_config(config: &Config, backend: Arc<dyn ProductBackend>) -> Self {
        let cache = ProductCache::new(config.cache_ttl()).with_max_entries(config.max_entries);
        Self {
            catalog: CatalogService::new(cache, backend),
            admin_token: config.admin_token.as_deref().map(Arc::from),
        }
    }
}

/// Renders a cached read with `Cache-Control` and `X-Cache` headers.
fn cached_response<T: Serialize>(cached: Cached<T>) -> Response {
    let cache_control = cached.cache_control();
    let x_cache = if cached.hit { "HIT" } else { "MISS" };
    (
        [
            (header::CACHE_CONTROL, cache_control),
            (HeaderName::from_static(X_CACHE), x_cache.to_string()),
        ],
        Json(cached.value),
    )
        .into_response()
}

/// Handler for GET /api/products
///
/// Supports `page`, `limit`, `category`, `brand` and `sort` query parameters.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let query = ListQuery::from(params);
    let cached = state.catalog.list_products(&query).await?;
    Ok(cached_response(cached))
}

/// Handler for GET /api/products/:slug
pub async fn product_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let cached = state.catalog.product_by_slug(&slug).await?;
    Ok(cached_response(cached))
}

/// Handler for POST /api/products (admin)
pub async fn create_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| CatalogError::InvalidRequest(e.body_text()))?;
    let product = state.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for PUT /api/products/:id (admin)
pub async fn update_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| CatalogError::InvalidRequest(e.body_text()))?;
    let product = state.catalog.update_product(&id, input).await?;
    Ok(Json(product))
}

/// Handler for DELETE /api/products/:id (admin)
pub async fn delete_product_handler(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.catalog.delete_product(&id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Handler for POST /api/products/generate-seo
///
/// Public and stateless, nothing is cached or written.
pub async fn generate_seo_handler(
    payload: std::result::Result<Json<SeoRequest>, JsonRejection>,
) -> Result<Json<SeoMetadata>> {
    let Json(request) = payload.map_err(|e| CatalogError::InvalidRequest(e.body_text()))?;
    Ok(Json(generate_seo(&request)))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.catalog.cache();
    let cache = cache.read().await;
    Json(StatsResponse::new(
        &cache.stats(),
        cache.max_entries(),
        cache.ttl().as_secs(),
    ))
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Fallback for unknown paths.
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse::new(uri.path())),
    )
}
