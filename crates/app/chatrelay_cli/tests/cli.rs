//! End-to-end tests for the `chatrelay` binary against an in-process relay.

use std::net::SocketAddr;

use assert_cmd::Command;
use chatrelay_api::{RelayState, relay_router};
use chatrelay_api::middleware::request_log::TracingRequestLogger;
use predicates::prelude::*;

async fn spawn_relay() -> SocketAddr {
    let app = relay_router(RelayState {
        upstream: None,
        request_logger: std::sync::Arc::new(TracingRequestLogger),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn chatrelay(log_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatrelay").unwrap();
    cmd.env_remove("CHATRELAY_URL")
        .arg("--log-file")
        .arg(log_dir.path().join("chatrelay.log"));
    cmd
}

#[test]
fn version_prints_package_version() {
    let dir = tempfile::tempdir().unwrap();
    chatrelay(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test(flavor = "multi_thread")]
async fn send_prints_placeholder_reply() {
    let addr = spawn_relay().await;
    let dir = tempfile::tempdir().unwrap();

    chatrelay(&dir)
        .args(["send", "hi", "--url", &format!("http://{addr}")])
        .assert()
        .success()
        .stdout(predicate::str::diff("Not implemented yet...\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn health_prints_ok() {
    let addr = spawn_relay().await;
    let dir = tempfile::tempdir().unwrap();

    chatrelay(&dir)
        .args(["health", "--url", &format!("http://{addr}")])
        .assert()
        .success()
        .stdout(predicate::str::diff("ok\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_relay_renders_error_reply() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let dir = tempfile::tempdir().unwrap();

    chatrelay(&dir)
        .args(["send", "hi", "--url", &format!("http://{addr}")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Error:"));
}

#[test]
fn blank_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    chatrelay(&dir)
        .args(["send", "   ", "--url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("message is empty"));
}
