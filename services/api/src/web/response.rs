//! services/api/src/web/response.rs
//!
//! The `{ success, data?, message?, count? }` envelope every endpoint speaks,
//! and the mapping from core errors to HTTP status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use professor_directory_core::{AuthError, DirectoryError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Successful response carrying data.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            count: None,
        }
    }

    pub fn listing(data: T, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::data(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Response with only a human-readable message, used for failures too.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Failures a handler can return; each maps to one status code.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    /// Detail is logged, never sent.
    #[error("internal: {0}")]
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            HttpError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            HttpError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            HttpError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = MessageResponse {
            success: false,
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DirectoryError> for HttpError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Validation(m)
            | DirectoryError::InvalidArgument(m)
            | DirectoryError::DuplicateKey(m) => HttpError::BadRequest(m),
            DirectoryError::NotFound(m) => HttpError::NotFound(m),
            DirectoryError::Upstream(m) => HttpError::Internal(m),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => HttpError::Unauthorized("Invalid credentials".into()),
            AuthError::InvalidToken => HttpError::Unauthorized("Invalid token".into()),
            AuthError::TokenExpired => HttpError::Unauthorized("Token expired".into()),
            AuthError::Internal(m) => HttpError::Internal(m),
        }
    }
}

/// Malformed JSON and wrongly typed fields are client errors, reported in the envelope.
impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
