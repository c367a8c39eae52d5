//! services/api/src/web/images.rs
//!
//! Proxies profile-photo uploads to the external image host.

use axum::{
    extract::{Multipart, State},
    Json,
};
use professor_directory_core::ImageUpload;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::{response::HttpError, state::AppState};

/// Name of the multipart part carrying the image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    /// Public HTTPS URL of the hosted image.
    pub url: String,
}

/// Upload a profile image.
///
/// Accepts a multipart/form-data request with an `image` file part and
/// returns the URL assigned by the image host.
#[utoipa::path(
    post,
    path = "/images/upload",
    request_body(content_type = "multipart/form-data", description = "The image to upload, in an `image` part."),
    responses(
        (status = 200, description = "Image hosted", body = UploadResponse),
        (status = 400, description = "No image part, empty file or not an image"),
        (status = 500, description = "Image host unavailable")
    )
)]
pub async fn upload_image_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    let image_host = state
        .image_host
        .clone()
        .ok_or_else(|| HttpError::Internal("image host is not configured".to_string()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(HttpError::BadRequest(
                "Uploaded file must be an image".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| HttpError::BadRequest(format!("Failed to read file bytes: {}", e)))?;
        upload = Some(ImageUpload {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let upload = upload
        .filter(|u| !u.data.is_empty())
        .ok_or_else(|| HttpError::BadRequest("No image file provided".to_string()))?;

    let size = upload.data.len();
    let url = image_host
        .upload_image(upload)
        .await
        .map_err(|e| HttpError::Internal(e.to_string()))?;
    info!(bytes = size, "Image uploaded");

    Ok(Json(UploadResponse { success: true, url }))
}
