//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::ErrorCode;
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, User, UserInfo, UserRole};

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{validate_email, validate_password, validate_text_range};
use crate::utils::{ApiResult, AppError, ok, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

const MIN_USER_NAME_LEN: usize = 2;
const MAX_USER_NAME_LEN: usize = 100;

fn issue_token(state: &ServerState, user: &User) -> Result<LoginResponse, AppError> {
    let token = state
        .get_jwt_service()
        .generate_token(user.id, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    Ok(LoginResponse {
        token,
        user: UserInfo::from(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<LoginResponse> {
    validate_text_range(&req.name, "name", MIN_USER_NAME_LEN, MAX_USER_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = req.email.trim().to_lowercase();
    if user::find_by_email(state.pool(), &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = match user::create(state.pool(), req.name.trim(), &email, &hash, UserRole::User)
        .await
    {
        Ok(u) => u,
        // Lost a race with a concurrent registration
        Err(RepoError::Duplicate(_)) => return Err(AppError::new(ErrorCode::EmailAlreadyRegistered)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = created.id, "User registered");
    Ok(ok_with_message("Registration successful", issue_token(&state, &created)?))
}

/// Look up and verify credentials with a fixed delay and a unified error
async fn authenticate(state: &ServerState, req: &LoginRequest) -> Result<User, AppError> {
    let email = req.email.trim().to_lowercase();
    let found = user::find_by_email(state.pool(), &email).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    match found {
        Some(u) if verify_password(&req.password, &u.password_hash) => Ok(u),
        Some(u) => {
            security_log!("WARN", "login_failed", user_id = u.id, reason = "invalid_password");
            Err(AppError::invalid_credentials())
        }
        None => {
            security_log!("WARN", "login_failed", email = email.as_str(), reason = "user_not_found");
            Err(AppError::invalid_credentials())
        }
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = authenticate(&state, &req).await?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), "User logged in");
    Ok(ok_with_message("Login successful", issue_token(&state, &user)?))
}

/// POST /api/admin/login
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = authenticate(&state, &req).await?;
    if user.role != UserRole::Admin {
        security_log!("WARN", "admin_login_denied", user_id = user.id);
        return Err(AppError::admin_required());
    }
    tracing::info!(user_id = user.id, "Admin logged in");
    Ok(ok_with_message("Login successful", issue_token(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> ApiResult<UserInfo> {
    let user = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ok(UserInfo::from(&user)))
}
