//! API Routes
//!
//! Configures the Axum router with the catalog endpoints and middleware.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    create_product_handler, delete_product_handler, generate_seo_handler, health_handler,
    list_products_handler, not_found_handler, product_handler, stats_handler,
    update_product_handler, AppState,
};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Creates the router allowing any CORS origin.
pub fn create_router(state: AppState) -> Router {
    create_router_with_origins(state, &[])
}

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/products` - List products (cached)
/// - `GET /api/products/:key` - Product by slug (cached)
/// - `POST /api/products` - Create a product (admin)
/// - `PUT /api/products/:key` - Update a product by id (admin)
/// - `DELETE /api/products/:key` - Delete a product by id (admin)
/// - `POST /api/products/generate-seo` - SEO metadata for a draft product
/// - `GET /api/cache/stats` - Cache statistics
/// - `GET /api/health` - Health check endpoint
///
/// Reads address a product by slug and writes by id, both through `:key`.
/// `generate-seo` is a reserved slug, so the static route never shadows a
/// product.
///
/// # Middleware
/// - CORS: the given origins, or any origin when empty
/// - Compression: gzip
/// - Security headers
/// - Tracing: Logs all requests for debugging
pub fn create_router_with_origins(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route("/api/products/generate-seo", post(generate_seo_handler))
        .route(
            "/api/products/:key",
            get(product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        ))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer for the configured origins.
///
/// Unparsable origins are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(86_400));

    if origins.is_empty() {
        return base.allow_origin(Any).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}
