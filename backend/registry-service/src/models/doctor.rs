use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    /// Assigned by storage on create.
    pub id: Option<Uuid>,
    pub name: String,
    pub cpf: String,
    pub crm: String,
    pub email: String,
    pub specialty: String,
    pub password_hash: String,
}

impl Doctor {
    pub fn role(&self) -> Role {
        Role::Doctor
    }
}

/// Lookup fields supported by the doctor directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorField {
    Name,
    Email,
    Specialty,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DoctorDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "cpf is required"))]
    pub cpf: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "crm is required"))]
    pub crm: String,
    #[validate(length(min = 1, message = "specialty is required"))]
    pub specialty: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub id: Option<Uuid>,
    pub name: String,
    pub cpf: String,
    pub crm: String,
    pub email: String,
    pub specialty: String,
    pub role: Role,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        let role = doctor.role();
        Self {
            id: doctor.id,
            name: doctor.name,
            cpf: doctor.cpf,
            crm: doctor.crm,
            email: doctor.email,
            specialty: doctor.specialty,
            role,
        }
    }
}
