//! Relay client: the UI side of the `/api/chat` contract.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{ChatRequest, ChatResponse, HealthResponse};

/// Round-trip failures seen by the UI.
///
/// The `Display` text is what follows `"Error: "` in the rendered bubble.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("{0}")]
    Transport(String),

    #[error("Server error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Decode(String),
}

/// Sends one chat message and returns the relay's reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, content: &str) -> Result<ChatResponse, ClientError>;
}

/// reqwest-backed client for a running relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: Url,
}

impl RelayClient {
    /// Creates a client for `base_url` (e.g. `https://localhost:5000`).
    ///
    /// With `accept_invalid_certs` the client tolerates the relay's
    /// self-signed certificate.
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> Result<Self, ClientError> {
        let mut base_url: Url = base_url
            .parse()
            .map_err(|e: url::ParseError| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    /// `POST /api/chat`.
    pub async fn chat(&self, content: &str) -> Result<ChatResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("api/chat")?)
            .json(&ChatRequest {
                content: content.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        decode(resp).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let resp = self
            .http
            .get(self.endpoint("api/health")?)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        decode(resp).await
    }
}

#[async_trait]
impl ChatTransport for RelayClient {
    async fn send(&self, content: &str) -> Result<ChatResponse, ClientError> {
        self.chat(content).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post};

    use super::*;

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn status_error_renders_code_and_reason() {
        let err = ClientError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "Server error: 500 Internal Server Error");
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let err = RelayClient::new("not a url", false).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn base_path_is_preserved_when_joining() {
        let client = RelayClient::new("http://localhost:5000/relay", false).unwrap();
        let url = client.endpoint("api/chat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/relay/api/chat");
    }

    #[tokio::test]
    async fn chat_posts_content_and_parses_reply() {
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<ChatRequest>| async move {
                Json(ChatResponse::reply(format!("echo: {}", body.content)))
            }),
        );
        let addr = spawn(app).await;

        let client = RelayClient::new(&format!("http://{addr}"), false).unwrap();
        let resp = client.send("hello").await.unwrap();
        assert_eq!(resp.display_text(), "echo: hello");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "nope" })),
                )
            }),
        );
        let addr = spawn(app).await;

        let client = RelayClient::new(&format!("http://{addr}"), false).unwrap();
        let err = client.chat("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: 400 Bad Request");
    }

    #[tokio::test]
    async fn health_parses_status() {
        let app = Router::new().route("/api/health", get(|| async { Json(HealthResponse::ok()) }));
        let addr = spawn(app).await;

        let client = RelayClient::new(&format!("http://{addr}"), false).unwrap();
        assert_eq!(client.health().await.unwrap(), HealthResponse::ok());
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RelayClient::new(&format!("http://{addr}"), false).unwrap();
        let err = client.chat("hello").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
