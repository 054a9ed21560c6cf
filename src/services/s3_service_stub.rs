// Stub implementation when S3 feature is not enabled
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::image_store::{ImageStore, ImageUpload, UploadedImage};
use crate::config::S3Config;

#[derive(Debug, Clone)]
pub struct S3Service;

impl S3Service {
    pub async fn new(_config: S3Config) -> Result<Self> {
        Err(anyhow!("S3 support not compiled in. Enable the 's3' feature to store images in S3."))
    }
}

#[async_trait]
impl ImageStore for S3Service {
    async fn upload_image(&self, _folder: &str, _image: ImageUpload) -> Result<UploadedImage> {
        Err(anyhow!("S3 support not compiled in"))
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
