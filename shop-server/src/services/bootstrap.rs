//! Admin account bootstrap

use shared::models::UserRole;
use sqlx::SqlitePool;

use crate::auth::hash_password;
use crate::core::Config;
use crate::db::repository::user;
use crate::utils::AppError;

/// Create or promote the `ADMIN_EMAIL` account
///
/// Does nothing unless both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are configured.
/// An existing account keeps its password and is only promoted.
pub async fn ensure_admin(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        tracing::debug!("No bootstrap admin configured");
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    match user::find_by_email(pool, &email).await? {
        Some(existing) if existing.role == UserRole::Admin => {}
        Some(existing) => {
            user::set_role(pool, existing.id, UserRole::Admin).await?;
            tracing::info!(email = %email, "Existing account promoted to admin");
        }
        None => {
            let hash = hash_password(password)
                .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
            user::create(pool, config.admin_name.trim(), &email, &hash, UserRole::Admin).await?;
            tracing::info!(email = %email, "Bootstrap admin account created");
        }
    }
    Ok(())
}
