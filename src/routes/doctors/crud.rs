use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use super::parse_doctor_id;
use crate::{
    errors::DoctorError,
    models::{CreateDoctor, Doctor, DoctorCreatedResponse, DoctorMessageResponse, MessageResponse, UpdateDoctor},
    AppState,
};

/// Create a doctor from a JSON body
#[utoipa::path(
    post,
    path = "/api/doctors/add",
    tag = "doctors",
    request_body = CreateDoctor,
    responses(
        (status = 201, description = "Doctor created", body = DoctorCreatedResponse),
        (status = 400, description = "Malformed JSON body", body = crate::models::ErrorResponse),
        (status = 500, description = "Validation or database error", body = crate::models::ErrorResponse)
    )
)]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateDoctor>, JsonRejection>,
) -> Result<(StatusCode, Json<DoctorCreatedResponse>), DoctorError> {
    let Json(payload) = payload.map_err(|e| DoctorError::invalid_body(e.body_text()))?;
    let new_doctor = payload.into_new_doctor()?;

    let doctor = state
        .db
        .create_doctor(new_doctor)
        .await
        .map_err(DoctorError::database)?;

    info!("Doctor created: {} ({})", doctor.id, doctor.name);
    Ok((StatusCode::CREATED, Json(DoctorCreatedResponse::new(doctor))))
}

/// List every doctor
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "doctors",
    responses(
        (status = 200, description = "All stored doctors", body = Vec<Doctor>),
        (status = 500, description = "Database error", body = crate::models::ErrorResponse)
    )
)]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Doctor>>, DoctorError> {
    let doctors = state.db.list_doctors().await.map_err(DoctorError::database)?;
    debug!("Listing {} doctors", doctors.len());
    Ok(Json(doctors))
}

/// Overwrite the given fields of a doctor
#[utoipa::path(
    put,
    path = "/api/doctors/{id}",
    tag = "doctors",
    params(
        ("id" = uuid::Uuid, Path, description = "Doctor ID")
    ),
    request_body = UpdateDoctor,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorMessageResponse),
        (status = 400, description = "Malformed or invalid body", body = crate::models::ErrorResponse),
        (status = 404, description = "Doctor not found", body = crate::models::ErrorResponse),
        (status = 500, description = "Database error", body = crate::models::ErrorResponse)
    )
)]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateDoctor>, JsonRejection>,
) -> Result<Json<DoctorMessageResponse>, DoctorError> {
    let id = parse_doctor_id(&raw_id).ok_or_else(|| DoctorError::not_found(raw_id.clone()))?;

    let Json(changes) = payload.map_err(|e| DoctorError::invalid_body(e.body_text()))?;
    changes
        .validate()
        .map_err(|errors| DoctorError::invalid_body(errors.to_string()))?;

    let doctor = state
        .db
        .update_doctor(id, changes)
        .await
        .map_err(DoctorError::database)?
        .ok_or_else(|| DoctorError::not_found(id.to_string()))?;

    info!("Doctor updated: {}", doctor.id);
    Ok(Json(DoctorMessageResponse::new("Doctor updated successfully!", doctor)))
}

/// Delete a doctor; deleting an unknown id still succeeds
#[utoipa::path(
    delete,
    path = "/api/doctors/{id}",
    tag = "doctors",
    params(
        ("id" = uuid::Uuid, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Doctor deleted (or was already absent)", body = MessageResponse),
        (status = 500, description = "Database error", body = crate::models::ErrorResponse)
    )
)]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, DoctorError> {
    match parse_doctor_id(&raw_id) {
        Some(id) => {
            let deleted = state.db.delete_doctor(id).await.map_err(DoctorError::database)?;
            if deleted {
                info!("Doctor deleted: {}", id);
            } else {
                debug!("Delete requested for unknown doctor {}", id);
            }
        }
        None => debug!("Delete requested for malformed doctor id '{}'", raw_id),
    }

    Ok(Json(MessageResponse::new("Doctor deleted successfully!")))
}
