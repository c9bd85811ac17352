//! Health check
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/health | GET | none |
//!
//! Always 200 while the process serves requests; `status` turns `degraded`
//! when the database does not answer.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// connected | disconnected
    database: &'static str,
    timestamp: i64,
}

async fn health(State(state): State<ServerState>) -> ApiResult<HealthResponse> {
    let db_ok = state.db.ping().await;
    Ok(ok(HealthResponse {
        status: if db_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: if db_ok { "connected" } else { "disconnected" },
        timestamp: shared::util::now_millis(),
    }))
}
