use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// A single image received from a client, already type-checked
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    /// Canonical extension of the detected format (`jpg`, `png`)
    pub extension: String,
    pub data: Vec<u8>,
}

/// Where an uploaded image ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Public URL stored on the doctor record
    pub url: String,
    /// Provider-side identifier (Cloudinary public id, S3 key)
    pub public_id: String,
}

/// Remote binary storage for doctor portraits
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads `image` under the logical `folder` and returns its public URL
    async fn upload_image(&self, folder: &str, image: ImageUpload) -> Result<UploadedImage>;

    fn backend_name(&self) -> &'static str;
}

/// Sniffs the image format and checks it against the allowed extensions.
///
/// Returns the canonical extension of the detected format, or `None` when
/// the bytes are not an image, the format is not allowed, or the declared
/// file extension is not allowed.
pub fn detect_image_extension(file_name: &str, data: &[u8], allowed: &[String]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return None;
    }

    let is_allowed = |ext: &str| allowed.iter().any(|a| a == ext);
    let sniffed = kind.extension();
    if !is_allowed(sniffed) {
        return None;
    }

    if let Some(declared) = Path::new(file_name).extension().and_then(|e| e.to_str()) {
        if !is_allowed(&declared.to_lowercase()) {
            return None;
        }
    }

    Some(sniffed)
}

/// MIME type for a stored image extension
pub fn mime_type_for(extension: &str) -> String {
    mime_guess::from_ext(extension).first_or_octet_stream().to_string()
}
