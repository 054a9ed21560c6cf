use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::doctor::Doctor;

/// Returned by the JSON create endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorCreatedResponse {
    pub success: bool,
    pub doctor: Doctor,
}

/// Returned by the multipart create and update endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorMessageResponse {
    pub success: bool,
    pub message: String,
    pub doctor: Doctor,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human readable description
    pub error: String,
    /// Stable machine readable code, e.g. `DOCTOR_NOT_FOUND`
    pub code: String,
    pub status: u16,
}

impl DoctorCreatedResponse {
    pub fn new(doctor: Doctor) -> Self {
        Self { success: true, doctor }
    }
}

impl DoctorMessageResponse {
    pub fn new<S: Into<String>>(message: S, doctor: Doctor) -> Self {
        Self {
            success: true,
            message: message.into(),
            doctor,
        }
    }
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
