//! Structured logging
//!
//! The server and the upload jobs log through `tracing`; this module installs
//! the subscriber and holds the request log helpers used by the middleware.

use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::error::{FeedError, FeedResult};

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_telemetry(config: &TelemetryConfig) -> FeedResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(json_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_target(true)
            .compact();

        subscriber.with(fmt_layer).try_init()
    };

    result.map_err(|e| FeedError::Config(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!(
        service = %config.service_name,
        version = %env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

pub fn shutdown_telemetry() {
    tracing::info!("Telemetry shutdown complete");
}

/// Log a request start
#[inline]
pub fn log_request_start(request_id: &str, method: &str, path: &str) {
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Request started"
    );
}

/// Log a request completion
#[inline]
pub fn log_request_end(request_id: &str, path: &str, status: u16, latency: Duration) {
    tracing::info!(
        request_id = %request_id,
        path = %path,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "Request completed"
    );
}

/// Log an error
#[inline]
pub fn log_error(request_id: &str, error: &str, error_type: &str) {
    tracing::error!(
        request_id = %request_id,
        error = %error,
        error_type = %error_type,
        "Request failed"
    );
}
