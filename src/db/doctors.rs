use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::{Database, DoctorRepository};
use crate::models::{Doctor, NewDoctor, UpdateDoctor};

/// Standard doctor columns for SELECT / RETURNING clauses
pub const DOCTOR_FIELDS: &str = r#"
    id, name, specialization, experience, rating, image,
    availability, time_slots, consultation_type
"#;

#[async_trait]
impl DoctorRepository for Database {
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor> {
        let query_str = format!(
            r#"
            INSERT INTO doctors (name, specialization, experience, rating, image, availability, time_slots, consultation_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            DOCTOR_FIELDS
        );

        let created = sqlx::query_as::<_, Doctor>(&query_str)
            .bind(&doctor.name)
            .bind(&doctor.specialization)
            .bind(doctor.experience)
            .bind(doctor.rating)
            .bind(&doctor.image)
            .bind(&doctor.availability)
            .bind(&doctor.time_slots)
            .bind(doctor.consultation_type.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let query_str = format!("SELECT {} FROM doctors", DOCTOR_FIELDS);

        let doctors = sqlx::query_as::<_, Doctor>(&query_str)
            .fetch_all(&self.pool)
            .await?;

        Ok(doctors)
    }

    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctor) -> Result<Option<Doctor>> {
        // Single statement: the row is read and rewritten atomically
        let query_str = format!(
            r#"
            UPDATE doctors SET
                name = COALESCE($2, name),
                specialization = COALESCE($3, specialization),
                experience = COALESCE($4, experience),
                rating = COALESCE($5, rating),
                image = COALESCE($6, image),
                availability = COALESCE($7, availability),
                time_slots = COALESCE($8, time_slots),
                consultation_type = COALESCE($9, consultation_type)
            WHERE id = $1
            RETURNING {}
            "#,
            DOCTOR_FIELDS
        );

        let updated = sqlx::query_as::<_, Doctor>(&query_str)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.specialization)
            .bind(changes.experience)
            .bind(changes.rating)
            .bind(&changes.image)
            .bind(&changes.availability)
            .bind(&changes.time_slots)
            .bind(changes.consultation_type.map(|c| c.as_str()))
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete_doctor(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_health(&self) -> Result<bool> {
        let health = self.get_pool_health();
        tracing::debug!(
            "Pool: {} connections, {} idle, closed={}",
            health.size, health.num_idle, health.is_closed
        );
        if health.is_closed {
            return Ok(false);
        }
        self.check_pool_health().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
