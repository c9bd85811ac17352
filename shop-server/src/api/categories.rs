//! Category master list

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::utils::{ApiResult, ok};
use shared::catalog::CATEGORIES;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/categories", get(list))
}

/// GET /api/categories
async fn list() -> ApiResult<Vec<&'static str>> {
    Ok(ok(CATEGORIES.to_vec()))
}
