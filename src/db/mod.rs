use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Doctor, NewDoctor, UpdateDoctor};

pub mod doctors;
pub mod memory;

pub use memory::MemoryStore;

/// Storage operations for doctor records.
///
/// Implemented by the Postgres-backed [`Database`] and the in-process
/// [`MemoryStore`]; handlers only see this trait.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Stores a validated doctor and returns it with its generated identifier
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor>;

    /// Every stored doctor, in no particular order
    async fn list_doctors(&self) -> Result<Vec<Doctor>>;

    /// Overwrites the present fields; `None` when no record has this id
    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctor) -> Result<Option<Doctor>>;

    /// Removes the record if it exists; returns whether anything was deleted
    async fn delete_doctor(&self, id: Uuid) -> Result<bool>;

    async fn check_health(&self) -> Result<bool>;

    /// Releases connections once the server has drained
    async fn close(&self) {}

    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabasePoolHealth {
    pub size: u32,
    pub num_idle: usize,
    pub is_closed: bool,
}

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .min_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        let migrator = sqlx::migrate!("./migrations");
        tracing::info!("Found {} migrations", migrator.migrations.len());
        migrator.run(&self.pool).await?;
        Ok(())
    }

    /// Get database connection pool health information
    pub fn get_pool_health(&self) -> DatabasePoolHealth {
        DatabasePoolHealth {
            size: self.pool.size(),
            num_idle: self.pool.num_idle(),
            is_closed: self.pool.is_closed(),
        }
    }

    /// Check if the database pool is healthy and has available connections
    pub async fn check_pool_health(&self) -> Result<bool> {
        match tokio::time::timeout(Duration::from_secs(5), self.pool.acquire()).await {
            Ok(Ok(_conn)) => Ok(true),
            Ok(Err(e)) => {
                tracing::warn!("Database pool health check failed: {}", e);
                Ok(false)
            }
            Err(_) => {
                tracing::warn!("Database pool health check timed out");
                Ok(false)
            }
        }
    }
}
