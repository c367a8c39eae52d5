//! services/api/src/web/auth.rs
//!
//! Admin login and token verification endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use professor_directory_core::AdminClaims;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::{response::HttpError, state::AppState};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminUser {
    pub username: String,
    pub role: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: AdminUser,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub token: Option<String>,
}

/// Decoded token claims as returned to the admin panel.
#[derive(Serialize, ToSchema)]
pub struct TokenClaimsDto {
    pub username: String,
    pub role: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl From<AdminClaims> for TokenClaimsDto {
    fn from(c: AdminClaims) -> Self {
        Self {
            username: c.username,
            role: c.role,
            iat: c.iat,
            exp: c.exp,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub message: String,
    pub user: TokenClaimsDto,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /admin/login - Exchange the admin credentials for a 24-hour token
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, HttpError> {
    let Json(req) = req?;
    let (Some(username), Some(password)) = (non_blank(req.username), non_blank(req.password))
    else {
        return Err(HttpError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let issued = state.auth.authenticate(&username, &password).map_err(|e| {
        warn!("Failed admin login attempt");
        HttpError::from(e)
    })?;
    info!(username = %issued.claims.username, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: issued.token,
        user: AdminUser {
            username: issued.claims.username,
            role: issued.claims.role,
        },
    }))
}

/// POST /admin/verify-token - Check whether a token is still valid
#[utoipa::path(
    post,
    path = "/admin/verify-token",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 400, description = "Token missing"),
        (status = 401, description = "Token invalid or expired")
    )
)]
pub async fn verify_token_handler(
    State(state): State<Arc<AppState>>,
    req: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<VerifyTokenResponse>, HttpError> {
    let Json(req) = req?;
    let token = non_blank(req.token)
        .ok_or_else(|| HttpError::BadRequest("Token is required".to_string()))?;

    let claims = state.auth.verify(token.trim())?;

    Ok(Json(VerifyTokenResponse {
        success: true,
        message: "Token is valid".to_string(),
        user: claims.into(),
    }))
}
