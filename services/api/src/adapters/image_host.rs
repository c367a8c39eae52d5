//! services/api/src/adapters/image_host.rs
//!
//! This module contains the adapter for the Cloudinary upload API.
//! It implements the `ImageHostService` port from the `core` crate.

use async_trait::async_trait;
use chrono::Utc;
use professor_directory_core::domain::ImageUpload;
use professor_directory_core::ports::{ImageHostService, PortError, PortResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::ImageHostConfig;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ImageHostService` port using signed Cloudinary uploads.
#[derive(Clone)]
pub struct CloudinaryAdapter {
    client: reqwest::Client,
    config: ImageHostConfig,
}

impl CloudinaryAdapter {
    /// Creates a new `CloudinaryAdapter`.
    pub fn new(client: reqwest::Client, config: ImageHostConfig) -> Self {
        Self { client, config }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// Signs the alphabetically ordered upload parameters with the API secret.
    fn signature(&self, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            self.config.folder, timestamp, self.config.api_secret
        );
        format!("{:x}", Sha256::digest(to_sign.as_bytes()))
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct UploadErrorResponse {
    error: UploadErrorDetail,
}

#[derive(Deserialize)]
struct UploadErrorDetail {
    message: String,
}

//=========================================================================================
// `ImageHostService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageHostService for CloudinaryAdapter {
    async fn upload_image(&self, image: ImageUpload) -> PortResult<String> {
        let timestamp = Utc::now().timestamp();

        let file = Part::bytes(image.data.to_vec())
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| PortError::Unexpected(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.config.folder.clone())
            .text("signature", self.signature(timestamp))
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Image host unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<UploadErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(PortError::Unexpected(format!(
                "Image host rejected upload: {}",
                detail
            )));
        }

        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Unreadable image host response: {}", e)))?;
        Ok(body.secure_url)
    }
}
