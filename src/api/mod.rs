//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /api/products` - List products
//! - `GET /api/products/:slug` - Product by slug
//! - `POST /api/products` - Create a product (admin)
//! - `PUT /api/products/:id` - Update a product (admin)
//! - `DELETE /api/products/:id` - Delete a product (admin)
//! - `POST /api/products/generate-seo` - Generate SEO metadata
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /api/health` - Health check endpoint

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::AdminGuard;
pub use handlers::*;
pub use routes::{create_router, create_router_with_origins};
