use anyhow::{bail, Context};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig").field("secret", &"[REDACTED]").finish()
    }
}

/// Raw environment as read by envy; field names map to upper-case variables.
#[derive(Debug, Deserialize)]
struct EnvVars {
    #[serde(default = "default_app_host")]
    app_host: String,
    #[serde(default = "default_app_port")]
    app_port: u16,

    #[serde(default = "default_storage_backend")]
    storage_backend: StorageBackend,

    database_url: Option<String>,
    #[serde(default = "default_db_host")]
    db_host: String,
    #[serde(default = "default_db_port")]
    db_port: u16,
    #[serde(default = "default_db_username")]
    db_username: String,
    #[serde(default)]
    db_password: String,
    #[serde(default = "default_db_name")]
    db_name: String,
    #[serde(default = "default_db_max_connections")]
    database_max_connections: u32,

    jwt_secret: Option<String>,
}

// Default value functions
fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Postgres
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_username() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "registry".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

impl Config {
    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: EnvVars =
            envy::from_iter(vars).context("Failed to parse configuration from environment")?;

        let secret = match env.jwt_secret {
            Some(secret) if !secret.is_empty() => secret,
            _ => bail!("JWT_SECRET must be set"),
        };

        let url = match env.database_url {
            Some(url) if !url.is_empty() => url,
            _ => compose_database_url(
                &env.db_username,
                &env.db_password,
                &env.db_host,
                env.db_port,
                &env.db_name,
            ),
        };

        Ok(Config {
            app: AppConfig {
                host: env.app_host,
                port: env.app_port,
            },
            storage: env.storage_backend,
            database: DatabaseConfig {
                url,
                max_connections: env.database_max_connections,
            },
            jwt: JwtConfig { secret },
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.app.host.clone(), self.app.port)
    }
}

fn compose_database_url(user: &str, password: &str, host: &str, port: u16, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{}@{}:{}/{}", user, host, port, name)
    } else {
        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
    }
}
