use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

use super::image_store::{ImageStore, ImageUpload, UploadedImage};
use crate::config::CloudinaryConfig;

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

/// Signed uploads to the Cloudinary image API
#[derive(Debug, Clone)]
pub struct CloudinaryService {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryService {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        if config.cloud_name.is_empty() {
            return Err(anyhow!("Cloudinary cloud name is required"));
        }
        if config.api_key.is_empty() {
            return Err(anyhow!("Cloudinary API key is required"));
        }
        if config.api_secret.is_empty() {
            return Err(anyhow!("Cloudinary API secret is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Signs upload parameters: `k=v` pairs sorted by key, joined with `&`,
    /// followed by the API secret, hashed with SHA-256.
    ///
    /// The cloud must be set to verify SHA-256 signatures; the algorithm is
    /// not sent with the request.
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl ImageStore for CloudinaryService {
    async fn upload_image(&self, folder: &str, image: ImageUpload) -> Result<UploadedImage> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let signature = Self::sign(&signed, &self.config.api_secret);

        info!(
            "Uploading image {} ({} bytes) to Cloudinary folder {}",
            image.file_name,
            image.data.len(),
            folder
        );

        let file_part = Part::bytes(image.data)
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;

        let form = Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to reach Cloudinary: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CloudinaryErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(anyhow!("Cloudinary upload failed ({}): {}", status.as_u16(), message));
        }

        let uploaded: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Unexpected Cloudinary response: {}", e))?;

        debug!("Cloudinary stored {} at {}", uploaded.public_id, uploaded.secure_url);

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }
}
