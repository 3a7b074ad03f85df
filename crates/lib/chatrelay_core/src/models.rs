//! Chat domain and wire models.
//!
//! Wire field names follow the JSON contract exactly (`content`, `assistant`,
//! `userMessage`), so a few structs carry `#[serde(rename)]`.

use serde::{Deserialize, Serialize};

/// Placeholder reply returned by the relay when integration is disabled.
pub const PLACEHOLDER_REPLY: &str = "Not implemented yet...";

/// Fallback text shown when a successful reply carries no text.
pub const NO_RESPONSE_REPLY: &str = "No response from server";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the displayed conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// `POST /api/chat` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

/// `POST /api/chat` success body.
///
/// `assistant` is optional on the receiving side: the UI falls back to
/// [`NO_RESPONSE_REPLY`] when it is absent or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            assistant: Some(text.into()),
        }
    }

    /// Text to display for this reply.
    pub fn display_text(&self) -> &str {
        match self.assistant.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_RESPONSE_REPLY,
        }
    }
}

/// `{ "error": "..." }` failure body used by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `{ "status": "ok" }` health body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Relay → model service request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(rename = "userMessage")]
    pub user_message: String,
}

/// Model service → relay reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub assistant: String,
}

/// `{ "detail": "..." }` failure body used by the model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        let json = serde_json::to_value(Message::assistant("yo")).unwrap();
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn completion_request_uses_camel_case_field() {
        let json = serde_json::to_value(CompletionRequest {
            user_message: "hello".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "userMessage": "hello" }));
    }

    #[test]
    fn display_text_falls_back_when_reply_missing_or_empty() {
        assert_eq!(ChatResponse::default().display_text(), NO_RESPONSE_REPLY);
        assert_eq!(ChatResponse::reply("").display_text(), NO_RESPONSE_REPLY);
        assert_eq!(ChatResponse::reply("hey").display_text(), "hey");
    }

    #[test]
    fn chat_response_tolerates_missing_assistant() {
        let resp: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.assistant.is_none());
    }
}
