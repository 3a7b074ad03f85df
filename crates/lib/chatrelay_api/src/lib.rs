//! # chatrelay_api
//!
//! HTTP API library for Chatrelay.
//!
//! Two routers live here: the relay ([`relay_router`]) that the chat UI talks
//! to, and the model service ([`model_router`]) that the relay forwards to when
//! integration is enabled.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod tls;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chatrelay_core::completion::CompletionProvider;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{Integration, RelayConfig};
use crate::handlers::{chat, completion, health};
use crate::middleware::request_log::{RequestLogger, TracingRequestLogger, log_requests};
use crate::services::upstream::{ChatUpstream, HttpUpstream, UpstreamError};

/// Relay route paths.
pub mod routes {
    pub const GET_API_HEALTH: &str = "/api/health";
    pub const POST_API_CHAT: &str = "/api/chat";
    pub const GET_HEALTH: &str = "/health";
    pub const POST_CHAT: &str = "/chat";
}

/// Shared relay state passed to all relay handlers.
#[derive(Clone)]
pub struct RelayState {
    /// Live upstream, or `None` to answer with the placeholder reply.
    pub upstream: Option<Arc<dyn ChatUpstream>>,
    pub request_logger: Arc<dyn RequestLogger>,
}

impl RelayState {
    /// Builds relay state from configuration with the default `tracing`
    /// request logger.
    pub fn from_config(config: &RelayConfig) -> Result<Self, UpstreamError> {
        let upstream: Option<Arc<dyn ChatUpstream>> = match &config.integration {
            Integration::Disabled => None,
            Integration::Enabled { upstream_url } => {
                Some(Arc::new(HttpUpstream::new(upstream_url.clone())?))
            }
        };
        Ok(Self {
            upstream,
            request_logger: Arc::new(TracingRequestLogger),
        })
    }
}

/// Shared model-service state.
#[derive(Clone)]
pub struct ModelState {
    pub provider: Arc<dyn CompletionProvider>,
    pub request_logger: Arc<dyn RequestLogger>,
}

impl ModelState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            request_logger: Arc::new(TracingRequestLogger),
        }
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the relay router.
pub fn relay_router(state: RelayState) -> Router {
    let logger = state.request_logger.clone();

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .fallback(chat::not_found_handler)
        .layer(axum::middleware::from_fn_with_state(logger, log_requests))
        .layer(cors())
        .with_state(state)
}

/// Builds the model-service router.
pub fn model_router(state: ModelState) -> Router {
    let logger = state.request_logger.clone();

    Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_CHAT, post(completion::completion_handler))
        .fallback(completion::not_found_handler)
        .layer(axum::middleware::from_fn_with_state(logger, log_requests))
        .with_state(state)
}
