pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod swagger;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use config::{Config, StorageBackend};
use db::{Database, DoctorRepository, MemoryStore};
use services::{CloudinaryService, ImageStore, S3Service};

/// Process-wide services, built once at startup and shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DoctorRepository>,
    pub images: Arc<dyn ImageStore>,
    pub config: Config,
}

/// Liveness banner
pub async fn root() -> &'static str {
    "Medway API is running..."
}

/// Health check endpoint for monitoring
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let healthy = state.db.check_health().await.unwrap_or(false);
    let body = serde_json::json!({
        "status": if healthy { "ok" } else { "degraded" },
        "database": state.db.backend_name(),
        "image_store": state.images.backend_name(),
    });

    if healthy {
        Ok(Json(body))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(body)))
    }
}

/// Builds the full application router around `state`
pub fn create_app(state: Arc<AppState>) -> Router {
    // Room for the text fields and multipart framing on top of the image itself
    let body_limit = state.config.max_image_size_bytes().saturating_add(1024 * 1024);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .nest("/api/doctors", routes::doctors::router())
        .merge(swagger::create_swagger_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Opens the doctor store named by `DATABASE_URL` and brings its schema up to date
pub async fn connect_repository(config: &Config) -> Result<Arc<dyn DoctorRepository>> {
    if config.uses_memory_store() {
        info!("Using in-memory doctor store; records will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = Database::new(&config.database_url).await?;
    info!("Connected to Postgres");

    info!("Running SQLx migrations...");
    db.migrate().await?;
    info!("SQLx migrations completed successfully");

    Ok(Arc::new(db))
}

/// Builds the image store for the configured backend
pub async fn connect_image_store(config: &Config) -> Result<Arc<dyn ImageStore>> {
    let store: Arc<dyn ImageStore> = match config.storage_backend {
        StorageBackend::Cloudinary => Arc::new(CloudinaryService::new(config.cloudinary.clone())?),
        StorageBackend::S3 => Arc::new(S3Service::new(config.s3.clone()).await?),
    };
    info!("Image store ready: {} (folder {})", store.backend_name(), config.upload_folder);
    Ok(store)
}
