//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::completion::CompletionError;
use chatrelay_core::models::{DetailResponse, ErrorResponse};
use thiserror::Error;
use tracing::error;

use crate::services::upstream::UpstreamError;

/// Convenience alias for relay handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Relay errors with HTTP status mapping. Bodies are `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Upstream(e) => {
                error!(error = %e, "upstream call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// Convenience alias for model-service handler return types.
pub type ModelResult<T> = Result<T, ModelError>;

/// Model-service errors. Bodies are `{ "detail": "..." }`.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl IntoResponse for ModelError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ModelError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            ModelError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ModelError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            ModelError::Completion(e) => {
                error!(error = %e, "completion failed");
                let status = match &e {
                    CompletionError::Provider(_) => StatusCode::BAD_GATEWAY,
                    CompletionError::NoChoices | CompletionError::Config(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
        };
        (status, Json(DetailResponse { detail })).into_response()
    }
}
