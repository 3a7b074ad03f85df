//! Upstream service: forwards relay messages to the model service.
//!
//! The model service ships with a self-signed certificate, so the HTTP client
//! skips certificate validation. The reply body is checked for a string
//! `assistant` field before it is relayed.

use async_trait::async_trait;
use chatrelay_core::models::CompletionRequest;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Upstream call failures. Never shown to the client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to build upstream client: {0}")]
    Build(String),

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),
}

/// Forwards one user message and returns the assistant text.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    async fn forward(&self, content: &str) -> Result<String, UpstreamError>;
}

/// reqwest-backed upstream for `POST {upstream_url}` with `{ userMessage }`.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    url: Url,
}

impl HttpUpstream {
    pub fn new(url: Url) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| UpstreamError::Build(e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ChatUpstream for HttpUpstream {
    async fn forward(&self, content: &str) -> Result<String, UpstreamError> {
        debug!(url = %self.url, "forwarding message upstream");

        let resp = self
            .client
            .post(self.url.clone())
            .json(&CompletionRequest {
                user_message: content.to_string(),
            })
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidPayload(e.to_string()))?;
        assistant_text(body)
    }
}

/// Extracts the `assistant` string from an upstream reply.
pub fn assistant_text(body: serde_json::Value) -> Result<String, UpstreamError> {
    let serde_json::Value::Object(mut map) = body else {
        return Err(UpstreamError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    };
    match map.remove("assistant") {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(other) => Err(UpstreamError::InvalidPayload(format!(
            "'assistant' must be a string, got {other}"
        ))),
        None => Err(UpstreamError::InvalidPayload(
            "missing 'assistant' field".to_string(),
        )),
    }
}
