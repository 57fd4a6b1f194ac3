use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::factory::DoctorFactory;
use crate::db::Directory;
use crate::error::{AppError, Result};
use crate::models::{Doctor, DoctorDto, DoctorField};

/// Doctor use cases. Depends only on the doctor directory.
#[derive(Clone)]
pub struct DoctorUseCase {
    doctors: Arc<dyn Directory<Doctor>>,
    factory: DoctorFactory,
}

impl DoctorUseCase {
    pub fn new(doctors: Arc<dyn Directory<Doctor>>, factory: DoctorFactory) -> Self {
        Self { doctors, factory }
    }

    pub async fn get_all_doctors(&self) -> Result<Vec<Doctor>> {
        self.doctors.get_all().await
    }

    pub async fn get_doctor_by_id(&self, id: &str) -> Result<Doctor> {
        let doctor_id = Uuid::parse_str(id).map_err(|_| AppError::doctor_not_found(id))?;

        self.doctors
            .get(doctor_id)
            .await?
            .ok_or_else(|| AppError::doctor_not_found(id))
    }

    /// All doctors with exactly this specialty; NotFound when there are none.
    pub async fn get_doctor_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>> {
        let doctors = self
            .doctors
            .find_by_exact_field(DoctorField::Specialty, specialty)
            .await?;

        if doctors.is_empty() {
            return Err(AppError::NotFound(format!(
                "Doctors with specialty: {} not found at database.",
                specialty
            )));
        }

        Ok(doctors)
    }

    /// First doctor with exactly this name.
    pub async fn get_doctor_by_name(&self, name: &str) -> Result<Doctor> {
        self.doctors
            .find_by_exact_field(DoctorField::Name, name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::NotFound(format!("Doctor with name: {} not found at database.", name))
            })
    }

    pub async fn create_doctor(&self, dto: &DoctorDto) -> Result<Doctor> {
        let doctor = self.factory.create_new_doctor(dto)?;
        let created = self.doctors.create(doctor).await?;
        info!(doctor_id = ?created.id, specialty = %created.specialty, "doctor created");
        Ok(created)
    }
}
