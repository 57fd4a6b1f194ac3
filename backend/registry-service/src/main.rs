use actix_web::{App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registry_service::config::{Config, StorageBackend};
use registry_service::db::Storage;
use registry_service::security::{Argon2Hasher, TokenIssuer};
use registry_service::{routes, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,registry_service=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting registry-service v{}", env!("CARGO_PKG_VERSION"));

    let storage = match config.storage {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&config.database.url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            info!(
                max_connections = config.database.max_connections,
                "Database pool ready, migrations applied"
            );
            Storage::postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            Storage::in_memory()
        }
    };

    let hasher = Arc::new(Argon2Hasher::new()?);
    let issuer = Arc::new(TokenIssuer::new(&config.jwt.secret));
    let state = AppState::new(storage, hasher, issuer);

    let bind_address = config.bind_address();
    info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(move |cfg| state.register(cfg))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
