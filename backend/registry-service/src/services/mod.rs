pub mod auth;
pub mod doctors;
pub mod factory;
pub mod lifecycle;
pub mod patients;

pub use auth::{AuthUseCase, CredentialAuthenticator};
pub use doctors::DoctorUseCase;
pub use factory::{DoctorFactory, PatientFactory};
pub use lifecycle::PatientLifecycle;
pub use patients::PatientUseCase;
