//! Integration tests: build the relay router and drive it with `oneshot`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::routing::post;
use chatrelay_api::config::{Integration, RelayConfig, TlsPaths};
use chatrelay_api::middleware::request_log::{RequestLogger, RequestRecord};
use chatrelay_api::services::upstream::{ChatUpstream, HttpUpstream, UpstreamError};
use chatrelay_api::{RelayState, relay_router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Logger that keeps every record it receives.
#[derive(Default)]
struct RecordingLogger {
    records: Mutex<Vec<RequestRecord>>,
}

impl RequestLogger for RecordingLogger {
    fn log_request(&self, record: &RequestRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Upstream that answers with a fixed result and remembers what it was sent.
struct StubUpstream {
    reply: Result<String, ()>,
    forwarded: Mutex<Vec<String>>,
}

impl StubUpstream {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            forwarded: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(()),
            forwarded: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatUpstream for StubUpstream {
    async fn forward(&self, content: &str) -> Result<String, UpstreamError> {
        self.forwarded.lock().unwrap().push(content.to_string());
        self.reply
            .clone()
            .map_err(|_| UpstreamError::Transport("connection refused".into()))
    }
}

fn relay_state(upstream: Option<Arc<dyn ChatUpstream>>) -> (RelayState, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let state = RelayState {
        upstream,
        request_logger: logger.clone(),
    };
    (state, logger)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&body).expect("parse JSON");
    (status, json)
}

fn post_chat(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_health() -> Request<Body> {
    Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_always_ok() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    for _ in 0..3 {
        let (status, json) = call(app.clone(), get_health()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok" }));
    }
}

#[tokio::test]
async fn missing_content_is_bad_request() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    let (status, json) = call(app, post_chat("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "No \"content\" field in request body." }));
    assert!(json.get("assistant").is_none());
}

#[tokio::test]
async fn empty_or_non_string_content_is_bad_request() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    for body in [r#"{"content":""}"#, r#"{"content":null}"#, r#"{"content":42}"#] {
        let (status, _) = call(app.clone(), post_chat(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_error_body() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    let (status, json) = call(app, post_chat("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn untyped_or_empty_body_is_missing_content() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    let untyped = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"content":"hi"}"#))
        .unwrap();
    let no_header = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .body(Body::empty())
        .unwrap();

    for req in [untyped, no_header, post_chat("")] {
        let (status, json) = call(app.clone(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "No \"content\" field in request body." }));
    }
}

#[tokio::test]
async fn integration_disabled_returns_placeholder() {
    let (state, _) = relay_state(None);
    let app = relay_router(state);

    let (status, json) = call(app, post_chat(r#"{"content":"hi"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "assistant": "Not implemented yet..." }));
}

#[tokio::test]
async fn integration_enabled_relays_upstream_reply() {
    let upstream = Arc::new(StubUpstream::replying("GPT text"));
    let (state, _) = relay_state(Some(upstream.clone() as Arc<dyn ChatUpstream>));
    let app = relay_router(state);

    let (status, json) = call(app, post_chat(r#"{"content":"hi"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "assistant": "GPT text" }));
    assert_eq!(*upstream.forwarded.lock().unwrap(), vec!["hi".to_string()]);
}

#[tokio::test]
async fn upstream_failure_is_generic_internal_error() {
    let (state, _) = relay_state(Some(Arc::new(StubUpstream::failing())));
    let app = relay_router(state);

    let (status, json) = call(app, post_chat(r#"{"content":"hi"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn every_request_is_logged_once_with_method_and_path() {
    let (state, logger) = relay_state(None);
    let app = relay_router(state);

    call(app.clone(), get_health()).await;
    call(app.clone(), post_chat("{}")).await;
    let (status, _) = call(
        app,
        Request::builder()
            .uri("/api/unknown?x=1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let records = logger.records.lock().unwrap();
    let seen: Vec<(Method, &str)> = records
        .iter()
        .map(|r| (r.method.clone(), r.path.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::GET, "/api/health"),
            (Method::POST, "/api/chat"),
            (Method::GET, "/api/unknown?x=1"),
        ]
    );
    assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

/// Starts a plain-HTTP stand-in for the model service.
async fn spawn_model_service(reply: Value, status: StatusCode) -> String {
    let app = Router::new().route(
        "/chat",
        post(move |Json(body): Json<Value>| {
            let reply = reply.clone();
            async move {
                assert!(body["userMessage"].is_string());
                (status, Json(reply))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/chat")
}

fn enabled_config(upstream_url: &str) -> RelayConfig {
    RelayConfig {
        bind_addr: "127.0.0.1:0".into(),
        tls: TlsPaths::default(),
        integration: Integration::Enabled {
            upstream_url: upstream_url.parse().unwrap(),
        },
    }
}

#[tokio::test]
async fn http_upstream_round_trip() {
    let url = spawn_model_service(json!({ "assistant": "from model" }), StatusCode::OK).await;
    let state = RelayState::from_config(&enabled_config(&url)).unwrap();
    let app = relay_router(state);

    let (status, json) = call(app, post_chat(r#"{"content":"hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "assistant": "from model" }));
}

#[tokio::test]
async fn http_upstream_with_wrong_shape_is_internal_error() {
    let url = spawn_model_service(json!({ "reply": "wrong field" }), StatusCode::OK).await;
    let state = RelayState::from_config(&enabled_config(&url)).unwrap();
    let app = relay_router(state);

    let (status, json) = call(app, post_chat(r#"{"content":"hello"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn http_upstream_error_status_is_internal_error() {
    let url = spawn_model_service(
        json!({ "detail": "No choices returned by OpenAI API." }),
        StatusCode::BAD_GATEWAY,
    )
    .await;
    let upstream = HttpUpstream::new(url.parse().unwrap()).unwrap();
    let err = upstream.forward("hello").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status(502)));
}

#[tokio::test]
async fn disabled_config_builds_placeholder_state() {
    let config = RelayConfig {
        bind_addr: "127.0.0.1:0".into(),
        tls: TlsPaths::default(),
        integration: Integration::Disabled,
    };
    let state = RelayState::from_config(&config).unwrap();
    assert!(state.upstream.is_none());
}
