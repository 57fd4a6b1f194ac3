use actix_web::web;
use std::sync::Arc;

use crate::db::Storage;
use crate::error::AppError;
use crate::security::{PasswordHasher, TokenIssuer};
use crate::services::{
    AuthUseCase, CredentialAuthenticator, DoctorFactory, DoctorUseCase, PatientFactory,
    PatientUseCase,
};

/// Explicit wiring of use cases to the gateways each one needs.
///
/// Built once at startup; everything inside is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<PatientUseCase>,
    pub doctors: Arc<DoctorUseCase>,
    pub auth: Arc<AuthUseCase>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(storage: Storage, hasher: Arc<dyn PasswordHasher>, issuer: Arc<TokenIssuer>) -> Self {
        let patients = PatientUseCase::new(
            storage.patients.clone(),
            PatientFactory::new(hasher.clone()),
        );
        let doctors = DoctorUseCase::new(storage.doctors.clone(), DoctorFactory::new(hasher.clone()));
        let authenticator = CredentialAuthenticator::new(storage.patients, storage.doctors, hasher);
        let auth = AuthUseCase::new(authenticator, issuer.clone());

        Self {
            patients: Arc::new(patients),
            doctors: Arc::new(doctors),
            auth: Arc::new(auth),
            issuer,
        }
    }

    /// Register shared data and the JSON body policy on an app.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.patients.clone()))
            .app_data(web::Data::from(self.doctors.clone()))
            .app_data(web::Data::from(self.auth.clone()))
            .app_data(web::Data::from(self.issuer.clone()))
            .app_data(json_config());
    }
}

/// Malformed or incomplete bodies become validation errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "rejected request body");
        AppError::Validation(err.to_string()).into()
    })
}
