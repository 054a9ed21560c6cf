use axum::http::StatusCode;
use thiserror::Error;

use super::{impl_into_response, AppError};
use crate::models::ValidationErrors;

/// Errors raised while serving doctor requests
#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Doctor {id} not found")]
    NotFound { id: String },

    #[error("No image was attached to the request")]
    MissingImage,

    #[error("Image '{file_name}' is not an accepted type (allowed: {allowed})")]
    UnsupportedImageType { file_name: String, allowed: String },

    #[error("Image exceeds the {max} byte limit")]
    ImageTooLarge { max: usize },

    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Image upload failed: {message}")]
    Upload { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl AppError for DoctorError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Creation-time validation failures keep the 500 existing clients expect
            DoctorError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DoctorError::NotFound { .. } => StatusCode::NOT_FOUND,
            DoctorError::MissingImage => StatusCode::BAD_REQUEST,
            DoctorError::UnsupportedImageType { .. } => StatusCode::BAD_REQUEST,
            DoctorError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DoctorError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            DoctorError::Upload { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DoctorError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            DoctorError::Validation(errors) => errors.to_string(),
            DoctorError::NotFound { .. } => "Doctor not found".to_string(),
            DoctorError::MissingImage => "Image upload failed. Please try again.".to_string(),
            DoctorError::UnsupportedImageType { allowed, .. } => {
                format!("Unsupported image type. Allowed formats: {}", allowed)
            }
            DoctorError::ImageTooLarge { max } => {
                format!("Image is too large (max {} MB)", max / (1024 * 1024))
            }
            DoctorError::InvalidBody { message } => message.clone(),
            DoctorError::Upload { message } => message.clone(),
            DoctorError::Database { message } => message.clone(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DoctorError::Validation(_) => "DOCTOR_VALIDATION_FAILED",
            DoctorError::NotFound { .. } => "DOCTOR_NOT_FOUND",
            DoctorError::MissingImage => "DOCTOR_IMAGE_MISSING",
            DoctorError::UnsupportedImageType { .. } => "DOCTOR_IMAGE_UNSUPPORTED_TYPE",
            DoctorError::ImageTooLarge { .. } => "DOCTOR_IMAGE_TOO_LARGE",
            DoctorError::InvalidBody { .. } => "DOCTOR_INVALID_BODY",
            DoctorError::Upload { .. } => "DOCTOR_IMAGE_UPLOAD_FAILED",
            DoctorError::Database { .. } => "DOCTOR_DATABASE_ERROR",
        }
    }
}

impl_into_response!(DoctorError);

/// Convenience methods for creating common doctor errors
impl DoctorError {
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn invalid_body<S: Into<String>>(message: S) -> Self {
        Self::InvalidBody { message: message.into() }
    }

    pub fn unsupported_image_type<S: Into<String>>(file_name: S, allowed: &[String]) -> Self {
        Self::UnsupportedImageType {
            file_name: file_name.into(),
            allowed: allowed.join(", "),
        }
    }

    pub fn image_too_large(max: usize) -> Self {
        Self::ImageTooLarge { max }
    }

    /// Wraps an adapter failure from the image store
    pub fn upload(error: anyhow::Error) -> Self {
        Self::Upload { message: error.to_string() }
    }

    /// Wraps an adapter failure from the doctor repository
    pub fn database(error: anyhow::Error) -> Self {
        Self::Database { message: error.to_string() }
    }
}

impl From<ValidationErrors> for DoctorError {
    fn from(errors: ValidationErrors) -> Self {
        DoctorError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldViolation;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_codes() {
        assert_eq!(DoctorError::not_found("abc").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(DoctorError::MissingImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(DoctorError::image_too_large(10).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            DoctorError::database(anyhow::anyhow!("connection refused")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DoctorError::Validation(ValidationErrors(vec![])).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_downstream_message_is_passed_through() {
        let error = DoctorError::upload(anyhow::anyhow!("Cloudinary returned 401: Invalid Signature"));
        assert_eq!(error.user_message(), "Cloudinary returned 401: Invalid Signature");
    }

    #[test]
    fn test_validation_message_names_fields() {
        let error: DoctorError = ValidationErrors(vec![FieldViolation {
            field: "name",
            message: "`name` is required".to_string(),
        }])
        .into();
        assert_eq!(error.user_message(), "Doctor validation failed: name: `name` is required");
    }

    #[tokio::test]
    async fn test_error_response_envelope() {
        let response = DoctorError::not_found("123").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "DOCTOR_NOT_FOUND");
        assert_eq!(value["status"], 404);
        assert_eq!(value["error"], "Doctor not found");
    }
}
