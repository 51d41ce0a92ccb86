//! HTTP request handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::engine::EngineStats;
use crate::types::LiveFeed;

pub const HEALTH_MESSAGE: &str = "Race feed mock is running. Use /live-feed for race data.";

/// GET /live-feed
///
/// Every call returns a freshly generated race; consecutive snapshots are
/// unrelated.
pub async fn live_feed(State(state): State<AppState>) -> Json<LiveFeed> {
    Json(state.engine.snapshot())
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        message: HEALTH_MESSAGE.to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if !state.shutdown.is_ready() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                reason: Some("Server is draining".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadyResponse {
            ready: true,
            reason: None,
        }),
    )
}

/// Generator statistics plus server lifecycle counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub engine: EngineStats,
    pub caution_rate: f64,
    pub uptime_seconds: u64,
    pub in_flight_requests: u64,
    pub draining: bool,
}

/// GET /admin/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = state.engine.stats();
    Json(StatsResponse {
        caution_rate: engine.caution_rate(),
        engine,
        uptime_seconds: state.engine.uptime().as_secs(),
        in_flight_requests: state.shutdown.in_flight_count(),
        draining: state.shutdown.is_draining(),
    })
}

/// POST /admin/stats/reset
pub async fn reset_stats(State(state): State<AppState>) -> StatusCode {
    state.engine.reset_stats();
    tracing::info!("Generator statistics reset");
    StatusCode::NO_CONTENT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub rust_version: String,
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rust_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "Race Feed Simulator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: env!("CARGO_PKG_DESCRIPTION").to_string(),
        endpoints: ["/live-feed", "/health", "/ready", "/version", "/admin/stats"]
            .iter()
            .map(|e| e.to_string())
            .collect(),
    })
}
