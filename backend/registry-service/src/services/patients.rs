use std::sync::Arc;
use tracing::info;

use super::factory::PatientFactory;
use super::lifecycle::PatientLifecycle;
use crate::db::{PatientStore, PersistenceGateway};
use crate::error::Result;
use crate::models::{Patient, PatientDto};

/// Patient use cases. Depends only on the patient store.
#[derive(Clone)]
pub struct PatientUseCase {
    patients: Arc<dyn PatientStore>,
    factory: PatientFactory,
    lifecycle: PatientLifecycle,
}

impl PatientUseCase {
    pub fn new(patients: Arc<dyn PatientStore>, factory: PatientFactory) -> Self {
        let lifecycle = PatientLifecycle::new(patients.clone());
        Self {
            patients,
            factory,
            lifecycle,
        }
    }

    /// Every stored patient, inactive ones included.
    pub async fn get_all_patients(&self) -> Result<Vec<Patient>> {
        self.patients.get_all().await
    }

    pub async fn get_patient_by_id(&self, id: &str) -> Result<Patient> {
        self.lifecycle.load_visible(id).await
    }

    pub async fn create_patient(&self, dto: &PatientDto) -> Result<Patient> {
        let patient = self.factory.create_new_patient(dto)?;
        let created = self.patients.create(patient).await?;
        info!(patient_id = ?created.id, "patient created");
        Ok(created)
    }

    pub async fn terminate_patient(&self, id: &str) -> Result<()> {
        self.lifecycle.terminate(id).await
    }
}
