//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::AppState;

/// The race data itself
pub fn feed_routes() -> Router<AppState> {
    Router::new().route("/live-feed", get(handlers::live_feed))
}

/// Generator statistics
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(handlers::get_stats))
        .route("/admin/stats/reset", post(handlers::reset_stats))
}

/// Health and service info routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/version", get(handlers::version))
        .route("/", get(handlers::root))
}
