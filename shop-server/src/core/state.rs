use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RateLimiter};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{bootstrap, uploads};
use crate::utils::AppError;

/// How often expired rate-limit windows are dropped
const RATE_LIMIT_CLEANUP_SECS: u64 = 300;

/// Server state - shared references to every service
///
/// Cloning is cheap: the pool and services are reference counted.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | DbService | SQLite pool |
/// | jwt_service | Arc<JwtService> | Token signing and validation |
/// | rate_limiter | RateLimiter | Per-IP counters for auth routes |
/// | started_at | Instant | Process start, for uptime |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl ServerState {
    /// Open the database, prepare upload directories and bootstrap the admin account
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir).map_err(|e| {
            AppError::internal(format!("Failed to create work dir {}: {e}", work_dir.display()))
        })?;
        uploads::ensure_dirs(&config.uploads_dir())?;

        let db = DbService::new(&config.database_path).await?;

        bootstrap::ensure_admin(&db.pool, config).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            rate_limiter: RateLimiter::new(),
            started_at: Instant::now(),
        })
    }

    /// Spawn periodic maintenance tasks
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(RATE_LIMIT_CLEANUP_SECS));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.config.uploads_dir()
    }
}
