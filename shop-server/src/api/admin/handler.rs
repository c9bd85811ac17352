use axum::extract::State;
use shared::models::AdminStats;

use crate::core::ServerState;
use crate::db::repository::stats;
use crate::utils::{ApiResult, ok};

/// GET /api/admin/stats
pub async fn get_stats(State(state): State<ServerState>) -> ApiResult<AdminStats> {
    let stats = stats::admin_stats(state.pool()).await?;
    Ok(ok(stats))
}
