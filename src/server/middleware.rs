//! HTTP middleware

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::telemetry::{log_request_end, log_request_start};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID extension
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuse the caller's request id or assign one, and echo it back
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    log_request_start(&request_id, method.as_str(), &path);

    let response = next.run(request).await;
    let status = response.status();

    if status.is_success() {
        log_request_end(&request_id, &path, status.as_u16(), start.elapsed());
    } else {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request failed"
        );
    }

    response
}
