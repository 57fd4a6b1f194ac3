/// Route table. Protected resources carry their own `RequireRole` guard.
use actix_web::web;

use crate::handlers::{auth, doctors, health, patients};
use crate::middleware::RequireRole;
use crate::models::Role;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(web::scope("/auth").route("/login", web::post().to(auth::login)))
        .service(
            web::scope("/patients")
                .service(
                    web::resource("")
                        .route(web::get().to(patients::list_patients))
                        .route(web::post().to(patients::create_patient)),
                )
                .service(
                    web::resource("/id/{id}")
                        .wrap(RequireRole::new([Role::Doctor]))
                        .route(web::get().to(patients::get_patient)),
                )
                .service(
                    web::resource("/id/{id}/terminate")
                        .wrap(RequireRole::new([Role::Patient]))
                        .route(web::post().to(patients::terminate_patient)),
                ),
        )
        .service(
            web::scope("/doctors")
                .service(
                    web::resource("")
                        .route(web::get().to(doctors::list_doctors))
                        .route(web::post().to(doctors::create_doctor)),
                )
                .service(web::resource("/id/{id}").route(web::get().to(doctors::get_doctor)))
                .service(
                    web::resource("/specialty/{specialty}")
                        .wrap(RequireRole::new([Role::Patient]))
                        .route(web::get().to(doctors::get_doctors_by_specialty)),
                )
                .service(
                    web::resource("/name/{name}")
                        .wrap(RequireRole::new([Role::Patient]))
                        .route(web::get().to(doctors::get_doctor_by_name)),
                ),
        );
}
