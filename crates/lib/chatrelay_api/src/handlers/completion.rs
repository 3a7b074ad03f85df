//! Model-service chat handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chatrelay_core::models::{CompletionRequest, CompletionResponse};
use tracing::debug;

use crate::ModelState;
use crate::error::{ModelError, ModelResult};

pub const EMPTY_MESSAGE_DETAIL: &str = "Empty 'userMessage'.";

/// `POST /chat`: `{ userMessage }` in, `{ assistant }` out.
pub async fn completion_handler(
    State(state): State<ModelState>,
    payload: Result<Json<CompletionRequest>, JsonRejection>,
) -> ModelResult<Json<CompletionResponse>> {
    let Json(request) =
        payload.map_err(|rejection| ModelError::Unprocessable(rejection.body_text()))?;

    let user_message = request.user_message.trim();
    if user_message.is_empty() {
        return Err(ModelError::Validation(EMPTY_MESSAGE_DETAIL.into()));
    }

    debug!(chars = user_message.len(), "completing user message");
    let assistant = state.provider.complete(user_message).await?;
    Ok(Json(CompletionResponse { assistant }))
}

/// Fallback for unknown model-service routes.
pub async fn not_found_handler() -> ModelError {
    ModelError::NotFound
}
