//! API routes
//!
//! - [`health`] - liveness and database check
//! - [`categories`] - category master list
//! - [`auth`] - register, login, admin login
//! - [`products`] - catalog and admin product management
//! - [`orders`] - order placement, reads and admin status changes
//! - [`admin`] - dashboard stats
//!
//! Uploaded files are served read-only from `/uploads`.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod form;
pub mod health;
pub mod orders;
pub mod products;

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::{Config, ServerState};
use crate::services::uploads::MAX_IMAGE_SIZE;

/// Largest accepted request body: an image upload plus multipart overhead
const MAX_BODY_BYTES: usize = MAX_IMAGE_SIZE + 1024 * 1024;

/// HTTP access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Permissive in development, otherwise only `FRONTEND_URL`
fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match config
        .frontend_url
        .as_deref()
        .map(|url| url.trim_end_matches('/').parse::<HeaderValue>())
    {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "FRONTEND_URL is not a valid origin; cross-origin requests disabled");
            base
        }
        None => {
            tracing::warn!("FRONTEND_URL not set; cross-origin requests disabled");
            base
        }
    }
}

/// Build the full application router
pub fn build_app(state: ServerState) -> Router {
    let uploads = ServeDir::new(state.uploads_dir());
    let cors = cors_layer(&state.config);

    Router::<ServerState>::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(auth::router(&state))
        .merge(products::router(&state))
        .merge(orders::router(&state))
        .merge(admin::router(&state))
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(log_request))
}
