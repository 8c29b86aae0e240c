//! Admin Guard
//!
//! Extractor protecting the catalog write routes with a static bearer token.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use super::handlers::AppState;
use crate::error::CatalogError;

/// Proof that the request carried the admin bearer token.
///
/// Rejects with 401 when no bearer token is present and 403 when the token
/// does not match. Passes every request when no admin token is configured.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = CatalogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Ok(AdminGuard);
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CatalogError::Unauthorized)?;

        if !tokens_match(token, expected) {
            debug!("Rejected write with invalid admin token");
            return Err(CatalogError::Forbidden);
        }

        Ok(AdminGuard)
    }
}

/// Compares two tokens without stopping at the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    given.len() == expected.len()
        && given
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
