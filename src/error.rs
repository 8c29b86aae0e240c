//! Error types for the catalog server
//!
//! Provides unified error handling using thiserror. The cache itself never
//! fails; every error here originates in the backend or the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::backend::BackendError;

// == Catalog Error Enum ==
/// Unified error type for the catalog server.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Requested product does not exist
    #[error("Product not found")]
    NotFound,

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// A unique field is already taken
    #[error("{0}")]
    Conflict(String),

    /// Missing bearer token on an admin route
    #[error("Not authorized")]
    Unauthorized,

    /// Bearer token present but not the admin token
    #[error("Admin only")]
    Forbidden,

    /// The product store is unavailable
    #[error("Service unavailable")]
    Unavailable(String),
}

impl From<BackendError> for CatalogError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => CatalogError::NotFound,
            BackendError::Validation(msg) => CatalogError::InvalidRequest(msg),
            BackendError::Conflict(msg) => CatalogError::Conflict(msg),
            BackendError::Unavailable(msg) => CatalogError::Unavailable(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Unauthorized => StatusCode::UNAUTHORIZED,
            CatalogError::Forbidden => StatusCode::FORBIDDEN,
            CatalogError::Unavailable(detail) => {
                error!("Product store unavailable: {}", detail);
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        // Details of 503 errors stay in the log
        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog server.
pub type Result<T> = std::result::Result<T, CatalogError>;
