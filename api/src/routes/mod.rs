//! HTTP route table.
//!
//! - `/events` → CPU utilization event stream
//! - `/health` → Health check endpoint
//!
//! Every route, including unknown paths, answers `OPTIONS` with a bare `200`
//! and permissive cross-origin headers.

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use util::state::AppState;

use crate::routes::{events::stream_cpu_usage, health::health_routes};

pub mod events;
pub mod health;

/// Builds the complete application router.
///
/// The table is a plain value; callers hand it to
/// [`crate::server::Server::bind`] or drive it directly in tests.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(stream_cpu_usage))
        .nest("/health", health_routes())
        .with_state(app_state)
        .layer(cors_layer())
}

/// Any origin, `GET` and `OPTIONS`, `Content-Type` request header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
