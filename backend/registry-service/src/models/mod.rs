pub mod auth;
pub mod doctor;
pub mod patient;

pub use auth::{IdentityClaim, LoginRequest, Role, TokenResponse};
pub use doctor::{Doctor, DoctorDto, DoctorField, DoctorResponse};
pub use patient::{Patient, PatientDto, PatientField, PatientResponse, PatientStatus};
