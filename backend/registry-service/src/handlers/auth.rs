/// Authentication handlers
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::Result;
use crate::models::LoginRequest;
use crate::services::AuthUseCase;

/// POST /auth/login
pub async fn login(
    auth: web::Data<AuthUseCase>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let token = auth.login(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Ok().json(token))
}
