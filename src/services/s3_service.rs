use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region as AwsRegion;

use super::image_store::{ImageStore, ImageUpload, UploadedImage};
use crate::config::S3Config;

/// Portrait storage in an S3 (or S3-compatible) bucket
#[derive(Debug, Clone)]
pub struct S3Service {
    client: Client,
    config: S3Config,
}

impl S3Service {
    pub async fn new(config: S3Config) -> Result<Self> {
        // Validate required fields
        if config.bucket_name.is_empty() {
            return Err(anyhow!("Bucket name is required"));
        }
        if config.access_key_id.is_empty() {
            return Err(anyhow!("Access key ID is required"));
        }
        if config.secret_access_key.is_empty() {
            return Err(anyhow!("Secret access key is required"));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None, // session token
            None, // expiry
            "medway-image-store",
        );

        let region = if config.region.is_empty() {
            "us-east-1".to_string()
        } else {
            config.region.clone()
        };

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .region(AwsRegion::new(region))
            .credentials_provider(credentials)
            .behavior_version_latest();

        // Set custom endpoint if provided (for S3-compatible services)
        if let Some(endpoint_url) = &config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url).force_path_style(true);
            info!("Using custom S3 endpoint: {}", endpoint_url);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Ok(Self { client, config })
    }
}

/// Object key for a new image: `<folder>/<uuid>.<ext>`
pub fn object_key(folder: &str, extension: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{}.{}", Uuid::new_v4(), extension)
    } else {
        format!("{}/{}.{}", folder, Uuid::new_v4(), extension)
    }
}

/// Public URL of a stored object.
///
/// Prefers the configured public base URL, then a path-style URL on the
/// custom endpoint, then the AWS virtual-hosted URL.
pub fn object_url(config: &S3Config, key: &str) -> String {
    if let Some(public_url) = &config.public_url {
        return format!("{}/{}", public_url.trim_end_matches('/'), key);
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        return format!("{}/{}/{}", endpoint_url.trim_end_matches('/'), config.bucket_name, key);
    }
    let region = if config.region.is_empty() { "us-east-1" } else { config.region.as_str() };
    format!("https://{}.s3.{}.amazonaws.com/{}", config.bucket_name, region, key)
}

#[async_trait]
impl ImageStore for S3Service {
    async fn upload_image(&self, folder: &str, image: ImageUpload) -> Result<UploadedImage> {
        let key = object_key(folder, &image.extension);
        info!(
            "Uploading image {} ({} bytes) to S3 object {}/{}",
            image.file_name,
            image.data.len(),
            self.config.bucket_name,
            key
        );

        self.client
            .put_object()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .content_type(&image.content_type)
            .body(ByteStream::from(image.data))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to upload S3 object {}: {}", key, e))?;

        Ok(UploadedImage {
            url: object_url(&self.config, &key),
            public_id: key,
        })
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3Config {
        S3Config {
            bucket_name: "medway-images".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: "test-key".to_string(),
            secret_access_key: "test-secret".to_string(),
            endpoint_url: None,
            public_url: None,
        }
    }

    #[tokio::test]
    async fn test_s3_service_creation() {
        // Builds the client without touching the network
        assert!(S3Service::new(config()).await.is_ok());

        let mut missing_bucket = config();
        missing_bucket.bucket_name = String::new();
        assert!(S3Service::new(missing_bucket).await.is_err());
    }

    #[test]
    fn test_object_key_layout() {
        let key = object_key("/medway/doctors/", "png");
        assert!(key.starts_with("medway/doctors/"));
        assert!(key.ends_with(".png"));
        assert!(!object_key("", "jpg").contains('/'));
    }

    #[test]
    fn test_object_url_variants() {
        let mut config = config();
        assert_eq!(
            object_url(&config, "medway/doctors/a.png"),
            "https://medway-images.s3.eu-west-1.amazonaws.com/medway/doctors/a.png"
        );

        config.endpoint_url = Some("http://minio:9000/".to_string());
        assert_eq!(
            object_url(&config, "medway/doctors/a.png"),
            "http://minio:9000/medway-images/medway/doctors/a.png"
        );

        config.public_url = Some("https://cdn.medway.example".to_string());
        assert_eq!(
            object_url(&config, "medway/doctors/a.png"),
            "https://cdn.medway.example/medway/doctors/a.png"
        );
    }
}
