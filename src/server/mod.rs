//! HTTP server implementation
//!
//! Serves the mock live feed plus health, version and generator statistics
//! endpoints on an Axum router.

mod handlers;
mod middleware;
mod routes;
mod state;
pub mod shutdown;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
pub use shutdown::*;
pub use state::*;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use axum::middleware as axum_middleware;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{CorsConfig, FeedConfig};
use crate::telemetry::init_telemetry;

/// Run the feed server until a shutdown signal arrives
pub async fn run_server(config: FeedConfig) -> anyhow::Result<()> {
    init_telemetry(&config.telemetry)?;

    let addr = config.server.socket_addr()?;
    let state = AppState::new(config.clone());
    let shutdown_state = state.shutdown.clone();
    let app = create_router(state);

    info!(
        "Starting race feed simulator v{} on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    info!(
        laps_in_race = config.generator.laps_in_race,
        seeded = config.generator.seed.is_some(),
        "Generator configured"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown(shutdown_state))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = build_cors_layer(&config.cors);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    Router::new()
        .merge(routes::feed_routes())
        .merge(routes::admin_routes())
        .merge(routes::health_routes())
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state.shutdown),
            request_tracking_middleware,
        ))
        .layer(cors)
        .layer(middleware)
        .with_state(state)
}

/// Browser dashboards poll the feed directly, so CORS is open by default
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_secs))
}
