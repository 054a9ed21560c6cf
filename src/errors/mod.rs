use axum::http::StatusCode;

/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get the error code for client-side handling
    fn error_code(&self) -> &'static str;
}

/// Macro to implement IntoResponse for all AppError types
/// This provides consistent HTTP response formatting
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                use crate::errors::AppError;
                use axum::response::Json;

                let status = self.status_code();
                if status.is_server_error() {
                    tracing::error!(code = self.error_code(), "{}", self);
                } else {
                    tracing::warn!(code = self.error_code(), "{}", self);
                }

                let body = Json(crate::models::ErrorResponse {
                    success: false,
                    error: self.user_message(),
                    code: self.error_code().to_string(),
                    status: status.as_u16(),
                });

                (status, body).into_response()
            }
        }
    };
}

pub(crate) use impl_into_response;

pub mod doctor;

pub use doctor::DoctorError;
