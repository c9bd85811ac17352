//! Admin dashboard API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/admin/stats | GET | admin |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/admin/stats", get(handler::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}
