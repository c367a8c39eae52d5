//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for the admin-only routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::{response::HttpError, state::AppState};

/// Middleware that validates the `Authorization: Bearer <token>` header.
///
/// If valid, inserts the decoded `AdminClaims` into request extensions for handlers to use.
/// If missing, malformed, forged or expired, returns 401 Unauthorized.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HttpError::Unauthorized("Access denied. No token provided.".to_string()))?;

    let claims = state.auth.verify(token).map_err(|e| {
        warn!("Rejected admin token: {}", e);
        HttpError::from(e)
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
