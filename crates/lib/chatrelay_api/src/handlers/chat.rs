//! Relay chat handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use chatrelay_core::models::{ChatResponse, PLACEHOLDER_REPLY};
use serde_json::Value;
use tracing::info;

use crate::RelayState;
use crate::error::{AppError, AppResult};

pub const MISSING_CONTENT_MESSAGE: &str = "No \"content\" field in request body.";

/// `POST /api/chat`: relay one user message.
///
/// Replies with the placeholder text when integration is disabled, otherwise
/// with the upstream's `assistant` text.
pub async fn chat_handler(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    let body = parse_body(&headers, &body)?;

    let content = body.get("content");
    info!(content = %describe_content(content), "received content");

    let content = content
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_CONTENT_MESSAGE.into()))?;

    let Some(upstream) = &state.upstream else {
        return Ok(Json(ChatResponse::reply(PLACEHOLDER_REPLY)));
    };

    let assistant = upstream.forward(content).await?;
    Ok(Json(ChatResponse::reply(assistant)))
}

/// Fallback for unknown relay routes.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("route".into())
}

/// Empty and non-JSON bodies parse as no body at all, so they end up as
/// missing content. Malformed JSON is rejected with the parser's message.
fn parse_body(headers: &HeaderMap, body: &[u8]) -> AppResult<Value> {
    if body.is_empty() || !is_json_content_type(headers) {
        return Ok(Value::Null);
    }
    let Json(value) = Json::<Value>::from_bytes(body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    Ok(value)
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Log form of the `content` field: strings as-is, anything else as raw JSON.
fn describe_content(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}
