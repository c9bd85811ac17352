//! Authorization middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;

/// Admin middleware - requires a valid token with `role == admin`
///
/// The resolved [`CurrentUser`] is stored in the request extensions, so
/// handlers behind this layer can still take it as an extractor.
///
/// | Error | HTTP |
/// |-------|------|
/// | No Authorization header | 401 NotAuthenticated |
/// | Expired / invalid token | 401 |
/// | Not an admin | 403 AdminRequired |
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let user = CurrentUser::from_request_parts(&mut parts, &state).await?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.as_str(),
            uri = format!("{:?}", parts.uri)
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
