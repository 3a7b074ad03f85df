//! Request logging middleware.
//!
//! Every request is reported to the [`RequestLogger`] held in router state
//! before it reaches its handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::info;

/// What is recorded for each incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub method: Method,
    /// Path including any query string.
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Receives one [`RequestRecord`] per request.
pub trait RequestLogger: Send + Sync {
    fn log_request(&self, record: &RequestRecord);
}

/// Writes each request as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRequestLogger;

impl RequestLogger for TracingRequestLogger {
    fn log_request(&self, record: &RequestRecord) {
        info!(
            method = %record.method,
            path = %record.path,
            timestamp = %record.timestamp.to_rfc3339(),
            "incoming request"
        );
    }
}

/// Axum middleware: stamps the request and hands it to the logger.
pub async fn log_requests(
    State(logger): State<Arc<dyn RequestLogger>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    logger.log_request(&RequestRecord {
        method: request.method().clone(),
        path,
        timestamp: Utc::now(),
    });

    next.run(request).await
}
