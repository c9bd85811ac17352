use crate::auth::JwtConfig;
use crate::utils::AppError;
use shared::ErrorCode;
use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | Database, uploads |
/// | DATABASE_PATH | {WORK_DIR}/shop.db | SQLite file |
/// | HTTP_PORT | 5000 | HTTP port |
/// | ENVIRONMENT | development | development / production |
/// | FRONTEND_URL | - | CORS origin (permissive in development) |
/// | JWT_SECRET | random in development | HS256 secret, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 10080 | Token lifetime |
/// | JWT_ISSUER | shop-server | Token issuer |
/// | JWT_AUDIENCE | shop-clients | Token audience |
/// | ADMIN_EMAIL | - | Bootstrap admin account |
/// | ADMIN_PASSWORD | - | Bootstrap admin password |
/// | ADMIN_NAME | Administrator | Bootstrap admin display name |
/// | LOG_LEVEL | info | Log level when RUST_LOG is unset |
/// | LOG_DIR | - | Daily rolling log files |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/shop HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and uploads
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    /// Allowed CORS origin outside development
    pub frontend_url: Option<String>,
    pub jwt: JwtConfig,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails when the JWT secret is missing outside development or too short.
    pub fn from_env() -> Result<Self, AppError> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let jwt = JwtConfig::from_env(environment == "development")
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?;

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| format!("{work_dir}/shop.db")),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            frontend_url: std::env::var("FRONTEND_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            jwt,
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            log_level: std::env::var("LOG_LEVEL").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
            work_dir,
            environment,
        })
    }

    /// Development configuration rooted at `work_dir`, without reading the environment
    ///
    /// Used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: format!("{work_dir}/shop.db"),
            work_dir,
            http_port,
            environment: "development".into(),
            frontend_url: None,
            jwt: JwtConfig::default(),
            admin_email: None,
            admin_password: None,
            admin_name: "Administrator".into(),
            log_level: None,
            log_dir: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `{work_dir}/uploads`, served under `/uploads`
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }
}
