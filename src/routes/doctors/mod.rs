use axum::{routing::{get, post, put}, Router};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

pub mod crud;
pub mod form;
pub mod upload;

pub use crud::*;
pub use form::*;
pub use upload::*;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Collection
        .route("/", get(list_doctors).post(upload_doctor))
        .route("/all", get(list_doctors))
        .route("/add", post(create_doctor))

        // Single record
        .route("/{id}", put(update_doctor).delete(delete_doctor))
}

/// Identifiers that do not parse can never match a stored record
pub(crate) fn parse_doctor_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
