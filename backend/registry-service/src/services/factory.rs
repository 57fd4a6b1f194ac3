/// DTO to entity construction
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Doctor, DoctorDto, Patient, PatientDto, PatientStatus};
use crate::security::PasswordHasher;

#[derive(Clone)]
pub struct PatientFactory {
    hasher: Arc<dyn PasswordHasher>,
}

impl PatientFactory {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Build an unsaved, active patient with a hashed password.
    pub fn create_new_patient(&self, dto: &PatientDto) -> Result<Patient> {
        Ok(Patient {
            id: None,
            name: dto.name.clone(),
            cpf: dto.cpf.clone(),
            email: dto.email.clone(),
            password_hash: self.hasher.hash(&dto.password)?,
            status: PatientStatus::Active,
        })
    }
}

#[derive(Clone)]
pub struct DoctorFactory {
    hasher: Arc<dyn PasswordHasher>,
}

impl DoctorFactory {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    pub fn create_new_doctor(&self, dto: &DoctorDto) -> Result<Doctor> {
        Ok(Doctor {
            id: None,
            name: dto.name.clone(),
            cpf: dto.cpf.clone(),
            crm: dto.crm.clone(),
            email: dto.email.clone(),
            specialty: dto.specialty.clone(),
            password_hash: self.hasher.hash(&dto.password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Role;
    use crate::security::password::MockPasswordHasher;
    use mockall::predicate::eq;

    fn hasher_returning(password: &'static str, hash: &'static str) -> Arc<dyn PasswordHasher> {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .with(eq(password))
            .times(1)
            .returning(move |_| Ok(hash.to_string()));
        Arc::new(hasher)
    }

    #[test]
    fn test_new_patient_is_active_with_hashed_password() {
        let factory = PatientFactory::new(hasher_returning("pw", "hashed-pw"));
        let dto = PatientDto {
            name: "Ana".into(),
            cpf: "111".into(),
            email: "a@x.com".into(),
            password: "pw".into(),
        };

        let patient = factory.create_new_patient(&dto).unwrap();

        assert_eq!(patient.id, None);
        assert_eq!(patient.name, "Ana");
        assert_eq!(patient.cpf, "111");
        assert_eq!(patient.email, "a@x.com");
        assert_eq!(patient.password_hash, "hashed-pw");
        assert_eq!(patient.status, PatientStatus::Active);
        assert_eq!(patient.role(), Role::Patient);
    }

    #[test]
    fn test_new_doctor_copies_fields_and_hashes_password() {
        let factory = DoctorFactory::new(hasher_returning("secret", "hashed-secret"));
        let dto = DoctorDto {
            name: "Dr. X".into(),
            cpf: "222".into(),
            email: "d@x.com".into(),
            crm: "123".into(),
            specialty: "Cardiology".into(),
            password: "secret".into(),
        };

        let doctor = factory.create_new_doctor(&dto).unwrap();

        assert_eq!(doctor.crm, "123");
        assert_eq!(doctor.specialty, "Cardiology");
        assert_eq!(doctor.password_hash, "hashed-secret");
        assert_eq!(doctor.role(), Role::Doctor);
    }

    #[test]
    fn test_hasher_failure_propagates() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(AppError::Internal("Failed to hash password".into())));
        let factory = PatientFactory::new(Arc::new(hasher));
        let dto = PatientDto {
            name: "Ana".into(),
            cpf: "111".into(),
            email: "a@x.com".into(),
            password: "pw".into(),
        };

        assert!(matches!(
            factory.create_new_patient(&dto),
            Err(AppError::Internal(_))
        ));
    }
}
