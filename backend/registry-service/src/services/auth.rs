/// Credential authentication across both person collections
use std::sync::Arc;
use tracing::{debug, warn};

use crate::db::{Directory, PatientStore};
use crate::error::{AppError, Result};
use crate::models::{Doctor, DoctorField, IdentityClaim, PatientField, Role, TokenResponse};
use crate::security::{PasswordHasher, TokenIssuer};

#[derive(Clone)]
pub struct CredentialAuthenticator {
    patients: Arc<dyn PatientStore>,
    doctors: Arc<dyn Directory<Doctor>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialAuthenticator {
    pub fn new(
        patients: Arc<dyn PatientStore>,
        doctors: Arc<dyn Directory<Doctor>>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            patients,
            doctors,
            hasher,
        }
    }

    /// Two-pass lookup: patients first, then doctors.
    ///
    /// Within each collection the first exact email match is the only
    /// candidate. A patient match with the wrong password still falls
    /// through to the doctor pass, so on an email collision the patient
    /// identity wins only when its password verifies.
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<Option<IdentityClaim>> {
        let patient = self
            .patients
            .find_by_exact_field(PatientField::Email, email)
            .await?
            .into_iter()
            .next();

        if let Some(patient) = patient {
            if self.hasher.verify(password, &patient.password_hash)? {
                let id = patient
                    .id
                    .ok_or_else(|| AppError::Internal("Stored patient has no id".to_string()))?;
                return Ok(Some(IdentityClaim {
                    id,
                    email: patient.email,
                    role: Role::Patient,
                    name: patient.name,
                }));
            }
            debug!("patient password mismatch; trying doctors");
        }

        let doctor = self
            .doctors
            .find_by_exact_field(DoctorField::Email, email)
            .await?
            .into_iter()
            .next();

        if let Some(doctor) = doctor {
            if self.hasher.verify(password, &doctor.password_hash)? {
                let id = doctor
                    .id
                    .ok_or_else(|| AppError::Internal("Stored doctor has no id".to_string()))?;
                return Ok(Some(IdentityClaim {
                    id,
                    email: doctor.email,
                    role: Role::Doctor,
                    name: doctor.name,
                }));
            }
        }

        Ok(None)
    }
}

/// Login flow: authenticate, then mint a token.
#[derive(Clone)]
pub struct AuthUseCase {
    authenticator: CredentialAuthenticator,
    issuer: Arc<TokenIssuer>,
}

impl AuthUseCase {
    pub fn new(authenticator: CredentialAuthenticator, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            authenticator,
            issuer,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        match self.authenticator.validate_user(email, password).await? {
            Some(claim) => {
                debug!(user_id = %claim.id, role = %claim.role, "credentials accepted");
                self.issuer.login(&claim)
            }
            None => {
                warn!("login rejected: invalid credentials");
                Err(AppError::Unauthorized("Invalid credentials".to_string()))
            }
        }
    }
}
