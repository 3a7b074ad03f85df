//! Health check endpoints.

use axum::Json;
use chatrelay_core::models::HealthResponse;

/// `GET /api/health` (relay) and `GET /health` (model service).
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
