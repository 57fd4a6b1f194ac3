use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{PatientDto, PatientResponse};
use crate::services::PatientUseCase;

pub async fn list_patients(patients: web::Data<PatientUseCase>) -> Result<HttpResponse> {
    let body: Vec<PatientResponse> = patients
        .get_all_patients()
        .await?
        .into_iter()
        .map(PatientResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_patient(
    patients: web::Data<PatientUseCase>,
    payload: web::Json<PatientDto>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let created = patients.create_patient(&payload).await?;
    Ok(HttpResponse::Created().json(PatientResponse::from(created)))
}

/// Doctors only.
pub async fn get_patient(
    patients: web::Data<PatientUseCase>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    info!(requested_by = %user.0.id, patient_id = %id, "patient lookup");

    let patient = patients.get_patient_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(PatientResponse::from(patient)))
}

/// Patients only. Deactivates the record; it is never removed.
pub async fn terminate_patient(
    patients: web::Data<PatientUseCase>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    info!(requested_by = %user.0.id, patient_id = %id, "patient termination requested");

    patients.terminate_patient(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
