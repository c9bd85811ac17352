//! Authentication Routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/register | POST | none, rate limited |
//! | /api/auth/login | POST | none, rate limited |
//! | /api/admin/login | POST | none, rate limited |
//! | /api/auth/me | GET | user |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::auth_rate_limit;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let limited = Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/admin/login", post(handler::admin_login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_rate_limit,
        ));

    Router::new()
        .route("/api/auth/me", get(handler::me))
        .merge(limited)
}
