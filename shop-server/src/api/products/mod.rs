//! Product API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/products | GET | none |
//! | /api/products/sale | GET | none |
//! | /api/products/{id} | GET | none |
//! | /api/products | POST | admin |
//! | /api/products/{id} | PUT, DELETE | admin |
//! | /api/products/sale/{id} | PUT, DELETE | admin |
//! | /api/products/admin/all | GET | admin |
//! | /api/products/admin/restore/{id} | PATCH | admin |
//! | /api/products/admin/permanent/{id} | DELETE | admin |
//! | /api/products/images | POST | admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/api/products", get(handler::list))
        .route("/api/products/sale", get(handler::list_on_sale))
        .route("/api/products/{id}", get(handler::get_by_id));

    let admin = Router::new()
        .route("/api/products", post(handler::create))
        .route(
            "/api/products/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route(
            "/api/products/sale/{id}",
            put(handler::set_sale).delete(handler::remove_sale),
        )
        .route("/api/products/admin/all", get(handler::list_all))
        .route("/api/products/admin/restore/{id}", patch(handler::restore))
        .route(
            "/api/products/admin/permanent/{id}",
            delete(handler::delete_permanent),
        )
        .route("/api/products/images", post(handler::upload_image))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public.merge(admin)
}
