use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::auth::Role;
use crate::error::AppError;

/// Patient status. `Inactive` is terminal: nothing moves a patient back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatientStatus {
    Active,
    Inactive,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "ACTIVE",
            PatientStatus::Inactive => "INACTIVE",
        }
    }

    /// Only active patients are visible to reads.
    pub fn is_visible(&self) -> bool {
        matches!(self, PatientStatus::Active)
    }

    pub fn can_transition_to(&self, next: PatientStatus) -> bool {
        matches!(
            (self, next),
            (PatientStatus::Active, PatientStatus::Inactive)
        )
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PatientStatus::Active),
            "INACTIVE" => Ok(PatientStatus::Inactive),
            other => Err(AppError::Internal(format!(
                "Unknown patient status stored: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    /// Assigned by storage on create.
    pub id: Option<Uuid>,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub password_hash: String,
    pub status: PatientStatus,
}

impl Patient {
    pub fn role(&self) -> Role {
        Role::Patient
    }

    pub fn is_visible(&self) -> bool {
        self.status.is_visible()
    }
}

/// Lookup fields supported by the patient directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PatientDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "cpf is required"))]
    pub cpf: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Outbound patient representation; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientResponse {
    pub id: Option<Uuid>,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub status: PatientStatus,
    pub role: Role,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        let role = patient.role();
        Self {
            id: patient.id,
            name: patient.name,
            cpf: patient.cpf,
            email: patient.email,
            status: patient.status,
            role,
        }
    }
}
