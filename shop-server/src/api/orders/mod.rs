//! Order API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders/place | POST | user (multipart) |
//! | /api/orders/user | GET | user |
//! | /api/orders/{id} | GET | owner or admin |
//! | /api/orders/all | GET | admin |
//! | /api/orders/status/{id} | PUT | admin |
//! | /api/orders/payment-status/{id} | PUT | admin |
//! | /api/orders/verify-payment/{id} | PUT | admin |
//! | /api/orders/reject-payment/{id} | PUT | admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let user = Router::new()
        .route("/api/orders/place", post(handler::place))
        .route("/api/orders/user", get(handler::list_mine))
        .route("/api/orders/{id}", get(handler::get_by_id));

    let admin = Router::new()
        .route("/api/orders/all", get(handler::list_all))
        .route("/api/orders/status/{id}", put(handler::update_status))
        .route(
            "/api/orders/payment-status/{id}",
            put(handler::update_payment_status),
        )
        .route(
            "/api/orders/verify-payment/{id}",
            put(handler::verify_payment),
        )
        .route(
            "/api/orders/reject-payment/{id}",
            put(handler::reject_payment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    user.merge(admin)
}
