//! OpenAI completion provider.
//!
//! Calls the chat-completions API (`/chat/completions`) with a single user
//! message and returns the first choice. No retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionError, CompletionProvider, CompletionSettings};

pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatCompletionMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionReply,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    settings: CompletionSettings,
}

impl OpenAiProvider {
    /// Creates a provider against the public OpenAI API.
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        settings: CompletionSettings,
    ) -> Result<Self, CompletionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CompletionError::Config(
                "OpenAI API key not found in 'OPENAI_API_KEY'.".to_string(),
            ));
        }
        Ok(Self {
            client,
            api_key,
            base_url: OPENAI_API_BASE_URL.to_string(),
            settings,
        })
    }

    /// Points the provider at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, user_message: &str) -> Result<String, CompletionError> {
        debug!(model = %self.settings.model, "requesting chat completion");

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest {
                model: &self.settings.model,
                messages: [ChatCompletionMessage {
                    role: "user",
                    content: user_message,
                }],
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| CompletionError::Provider(format!("OpenAI request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Provider(format!(
                "OpenAI chat completion failed: {status} {body}"
            )));
        }

        let data: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Provider(format!("OpenAI response parse error: {e}")))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        Ok(choice
            .message
            .content
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}
