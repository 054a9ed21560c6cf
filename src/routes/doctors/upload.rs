use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::form::DoctorForm;
use crate::{
    errors::DoctorError,
    models::DoctorMessageResponse,
    services::image_store::{detect_image_extension, mime_type_for, ImageUpload},
    AppState,
};

/// Create a doctor from a multipart form with an uploaded portrait
#[utoipa::path(
    post,
    path = "/api/doctors",
    tag = "doctors",
    request_body(content = String, description = "Doctor fields plus an `image` file (JPEG or PNG); `availability` and `timeSlots` are comma-separated", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Doctor added", body = DoctorMessageResponse),
        (status = 400, description = "No image attached or unsupported image type", body = crate::models::ErrorResponse),
        (status = 413, description = "Image too large", body = crate::models::ErrorResponse),
        (status = 500, description = "Validation, upload or database error", body = crate::models::ErrorResponse)
    )
)]
pub async fn upload_doctor(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DoctorMessageResponse>, DoctorError> {
    let mut multipart = multipart.map_err(|e| DoctorError::invalid_body(e.body_text()))?;
    let max_bytes = state.config.max_image_size_bytes();

    let mut form = DoctorForm::default();
    let mut uploaded_file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let data = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;

            // Browsers send an empty part for an untouched file input
            if data.is_empty() {
                continue;
            }
            uploaded_file = Some((file_name, data.to_vec()));
        } else {
            let value = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
            if !form.set(&name, value) {
                debug!("Ignoring unknown form field '{}'", name);
            }
        }
    }

    let (file_name, data) = uploaded_file.ok_or(DoctorError::MissingImage)?;

    if data.len() > max_bytes {
        return Err(DoctorError::image_too_large(max_bytes));
    }

    let allowed = &state.config.allowed_image_types;
    let extension = detect_image_extension(&file_name, &data, allowed)
        .ok_or_else(|| DoctorError::unsupported_image_type(file_name.clone(), allowed))?;

    // Reject bad fields before anything is sent to remote storage
    let mut create = form.into_create_doctor()?;

    let image = ImageUpload {
        file_name,
        content_type: mime_type_for(extension),
        extension: extension.to_string(),
        data,
    };
    let uploaded = state
        .images
        .upload_image(&state.config.upload_folder, image)
        .await
        .map_err(|e| {
            error!("Image upload to {} failed: {}", state.images.backend_name(), e);
            DoctorError::upload(e)
        })?;

    create.image = Some(uploaded.url);
    let new_doctor = create.into_new_doctor()?;

    let doctor = state
        .db
        .create_doctor(new_doctor)
        .await
        .map_err(|e| {
            error!("Doctor insert failed, uploaded image {} is orphaned", uploaded.public_id);
            DoctorError::database(e)
        })?;

    info!("Doctor added with uploaded image: {} ({})", doctor.id, uploaded.public_id);
    Ok(Json(DoctorMessageResponse::new("Doctor added successfully!", doctor)))
}

fn multipart_error(error: MultipartError, max_bytes: usize) -> DoctorError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DoctorError::image_too_large(max_bytes)
    } else {
        DoctorError::invalid_body(format!("Failed to read multipart form: {}", error.body_text()))
    }
}
