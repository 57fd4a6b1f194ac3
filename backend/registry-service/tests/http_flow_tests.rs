use actix_web::{http::header, http::StatusCode, test, App};
use serde_json::{json, Value};
use std::sync::Arc;

use registry_service::db::Storage;
use registry_service::models::{Role, TokenResponse};
use registry_service::routes;
use registry_service::security::{Argon2Hasher, TokenIssuer};
use registry_service::AppState;

const SECRET: &str = "http-flow-secret";

fn state() -> AppState {
    AppState::new(
        Storage::in_memory(),
        Arc::new(Argon2Hasher::new().expect("argon2 params")),
        Arc::new(TokenIssuer::new(SECRET)),
    )
}

fn ana() -> Value {
    json!({
        "name": "Ana",
        "cpf": "111",
        "email": "a@x.com",
        "password": "pw"
    })
}

fn cardiologist() -> Value {
    json!({
        "name": "Dr. X",
        "cpf": "222",
        "email": "d@x.com",
        "crm": "123",
        "specialty": "Cardiology",
        "password": "secret"
    })
}

fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

fn bearer(token: &TokenResponse) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token.access_token))
}

#[actix_web::test]
async fn test_patient_lifecycle_over_http() {
    let state = state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::configure),
    )
    .await;

    // GIVEN a registered patient and doctor
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/patients")
            .set_json(ana())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let patient: Value = test::read_body_json(resp).await;
    assert_eq!(patient["status"], "ACTIVE");
    assert_eq!(patient["role"], "patient");
    assert!(patient.get("password").is_none());
    let patient_id = patient["id"].as_str().expect("patient id").to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/doctors")
            .set_json(cardiologist())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let patient_token: TokenResponse =
        test::call_and_read_body_json(&app, login_request("a@x.com", "pw").to_request()).await;
    let doctor_token: TokenResponse =
        test::call_and_read_body_json(&app, login_request("d@x.com", "secret").to_request()).await;
    assert_eq!(patient_token.token_type, "Bearer");
    assert_eq!(patient_token.expires_in, 3600);

    // WHEN a doctor reads the patient
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/patients/id/{}", patient_id))
            .insert_header(bearer(&doctor_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["name"], "Ana");
    assert!(fetched.get("password").is_none());

    // AND the patient terminates the record
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/patients/id/{}/terminate", patient_id))
            .insert_header(bearer(&patient_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // THEN the record is hidden from id lookups
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/patients/id/{}", patient_id))
            .insert_header(bearer(&doctor_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        format!("Patient with id: {} not found at database.", patient_id)
    );

    // AND a second terminate finds nothing to deactivate
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/patients/id/{}/terminate", patient_id))
            .insert_header(bearer(&patient_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // AND the patient can still log in
    let token: TokenResponse =
        test::call_and_read_body_json(&app, login_request("a@x.com", "pw").to_request()).await;
    let claims = TokenIssuer::new(SECRET)
        .validate(&token.access_token)
        .expect("valid token");
    assert_eq!(claims.role, Role::Patient);
    assert_eq!(claims.name, "Ana");
    assert_eq!(claims.sub, patient_id);
}

#[actix_web::test]
async fn test_doctor_specialty_lookup_over_http() {
    let state = state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::configure),
    )
    .await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/doctors")
            .set_json(cardiologist())
            .to_request(),
    )
    .await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/patients")
            .set_json(ana())
            .to_request(),
    )
    .await;
    let patient_token: TokenResponse =
        test::call_and_read_body_json(&app, login_request("a@x.com", "pw").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/specialty/Cardiology")
            .insert_header(bearer(&patient_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doctors: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["name"], "Dr. X");
    assert_eq!(doctors[0]["role"], "doctor");
    assert!(doctors[0].get("password").is_none());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/specialty/Oncology")
            .insert_header(bearer(&patient_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/name/Dr.%20X")
            .insert_header(bearer(&patient_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doctor: Value = test::read_body_json(resp).await;
    assert_eq!(doctor["email"], "d@x.com");

    // Public reads need no token
    let resp = test::call_service(&app, test::TestRequest::get().uri("/doctors").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_role_guard_rejects_missing_and_wrong_tokens() {
    let state = state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::configure),
    )
    .await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/doctors")
            .set_json(cardiologist())
            .to_request(),
    )
    .await;
    let doctor_token: TokenResponse =
        test::call_and_read_body_json(&app, login_request("d@x.com", "secret").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/specialty/Cardiology")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/specialty/Cardiology")
            .insert_header(bearer(&doctor_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/doctors/specialty/Cardiology")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_bad_credentials_and_bodies() {
    let state = state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::configure),
    )
    .await;

    let resp = test::call_service(&app, login_request("nobody@x.com", "pw").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Missing field
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({ "name": "Ana", "cpf": "111", "email": "a@x.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    // Empty field
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({ "name": "", "cpf": "111", "email": "a@x.com", "password": "pw" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/doctors/id/not-a-uuid").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
