use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::Result;
use crate::models::{DoctorDto, DoctorResponse};
use crate::services::DoctorUseCase;

pub async fn list_doctors(doctors: web::Data<DoctorUseCase>) -> Result<HttpResponse> {
    let body: Vec<DoctorResponse> = doctors
        .get_all_doctors()
        .await?
        .into_iter()
        .map(DoctorResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_doctor(
    doctors: web::Data<DoctorUseCase>,
    payload: web::Json<DoctorDto>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let created = doctors.create_doctor(&payload).await?;
    Ok(HttpResponse::Created().json(DoctorResponse::from(created)))
}

pub async fn get_doctor(
    doctors: web::Data<DoctorUseCase>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let doctor = doctors.get_doctor_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(DoctorResponse::from(doctor)))
}

pub async fn get_doctors_by_specialty(
    doctors: web::Data<DoctorUseCase>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let body: Vec<DoctorResponse> = doctors
        .get_doctor_by_specialty(&path)
        .await?
        .into_iter()
        .map(DoctorResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn get_doctor_by_name(
    doctors: web::Data<DoctorUseCase>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let doctor = doctors.get_doctor_by_name(&path).await?;
    Ok(HttpResponse::Ok().json(DoctorResponse::from(doctor)))
}
