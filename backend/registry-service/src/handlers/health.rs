use actix_web::HttpResponse;
use serde_json::json;

/// Liveness probe
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "registry-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
