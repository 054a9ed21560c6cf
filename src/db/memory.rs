use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::DoctorRepository;
use crate::models::{Doctor, NewDoctor, UpdateDoctor};

/// In-process doctor store, selected with `DATABASE_URL=memory://`.
///
/// Records live for the lifetime of the process. Each operation holds the
/// lock for its whole duration, so a single record is never observed
/// half-updated.
#[derive(Default)]
pub struct MemoryStore {
    doctors: RwLock<Vec<Doctor>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.doctors.read().await.is_empty()
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor> {
        let created = doctor.into_doctor(Uuid::new_v4());
        self.doctors.write().await.push(created.clone());
        Ok(created)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        Ok(self.doctors.read().await.clone())
    }

    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctor) -> Result<Option<Doctor>> {
        let mut doctors = self.doctors.write().await;
        match doctors.iter_mut().find(|d| d.id == id) {
            Some(doctor) => {
                changes.apply_to(doctor);
                Ok(Some(doctor.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_doctor(&self, id: Uuid) -> Result<bool> {
        let mut doctors = self.doctors.write().await;
        let before = doctors.len();
        doctors.retain(|d| d.id != id);
        Ok(doctors.len() != before)
    }

    async fn check_health(&self) -> Result<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
