/// Patient visibility and status transitions
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{PatientStore, PersistenceGateway};
use crate::error::{AppError, Result};
use crate::models::{Patient, PatientStatus};

#[derive(Clone)]
pub struct PatientLifecycle {
    patients: Arc<dyn PatientStore>,
}

impl PatientLifecycle {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Load a patient that is visible to reads.
    ///
    /// Absent, inactive, and unparseable ids all produce the same NotFound.
    pub async fn load_visible(&self, id: &str) -> Result<Patient> {
        let patient_id = parse_patient_id(id)?;

        match self.patients.get(patient_id).await? {
            Some(patient) if patient.is_visible() => Ok(patient),
            Some(_) => {
                debug!(patient_id = %patient_id, "patient is inactive; hiding from read");
                Err(AppError::patient_not_found(id))
            }
            None => Err(AppError::patient_not_found(id)),
        }
    }

    /// ACTIVE -> INACTIVE. Terminal; there is no way back.
    ///
    /// The write is a compare-and-set on status, so of two concurrent
    /// terminations only one succeeds and the other reports NotFound.
    pub async fn terminate(&self, id: &str) -> Result<()> {
        let patient_id = parse_patient_id(id)?;
        let patient = self
            .patients
            .get(patient_id)
            .await?
            .ok_or_else(|| AppError::patient_not_found(id))?;

        // Inactive patients are invisible, so a refused transition looks like absence
        let next = PatientStatus::Inactive;
        if !patient.status.can_transition_to(next) {
            debug!(patient_id = %patient_id, status = %patient.status, "transition refused");
            return Err(AppError::patient_not_found(id));
        }

        let swapped = self
            .patients
            .compare_and_set_status(patient_id, patient.status, next)
            .await?;

        if !swapped {
            debug!(patient_id = %patient_id, "status changed concurrently; termination lost");
            return Err(AppError::patient_not_found(id));
        }

        info!(patient_id = %patient_id, "patient terminated");
        Ok(())
    }
}

fn parse_patient_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::patient_not_found(id))
}
