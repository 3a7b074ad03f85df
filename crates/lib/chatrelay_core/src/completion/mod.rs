//! Completion module: single-turn text completion behind the model service.
//!
//! # Public API
//!
//! - [`CompletionProvider`]: produce one assistant reply for one user message
//! - [`CompletionSettings`]: model parameters sent with every request
//! - [`openai::OpenAiProvider`]: OpenAI chat-completions implementation

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "chatgpt-4o-latest";
/// Default completion token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Errors that can occur while producing a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Config error: {0}")]
    Config(String),

    /// The provider could not be reached or answered with an error.
    #[error("{0}")]
    Provider(String),

    #[error("No choices returned by OpenAI API.")]
    NoChoices,
}

/// Model parameters for a completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Produces an assistant reply for a single user message.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the reply text, already trimmed.
    async fn complete(&self, user_message: &str) -> Result<String, CompletionError>;
}
