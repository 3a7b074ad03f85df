//! HTTPS serving with a PEM certificate pair.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::TlsPaths;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("TLS file not found: {0}")]
    MissingFile(String),

    #[error("Invalid TLS material: {0}")]
    Invalid(#[source] std::io::Error),

    #[error("Invalid bind address {addr}: {reason}")]
    BindAddr { addr: String, reason: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Loads the certificate and private key.
pub async fn load_tls(paths: &TlsPaths) -> Result<RustlsConfig, TlsError> {
    for path in [&paths.cert, &paths.key] {
        if !path.is_file() {
            return Err(TlsError::MissingFile(path.display().to_string()));
        }
    }
    RustlsConfig::from_pem_file(&paths.cert, &paths.key)
        .await
        .map_err(TlsError::Invalid)
}

fn parse_bind_addr(bind_addr: &str) -> Result<SocketAddr, TlsError> {
    bind_addr
        .parse()
        .map_err(|e: std::net::AddrParseError| TlsError::BindAddr {
            addr: bind_addr.to_string(),
            reason: e.to_string(),
        })
}

/// Serves `app` over HTTPS on `bind_addr` until `shutdown` is cancelled.
pub async fn serve_tls(
    bind_addr: &str,
    tls: RustlsConfig,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), TlsError> {
    let addr = parse_bind_addr(bind_addr)?;
    let listener = TcpListener::bind(addr).map_err(|source| TlsError::Bind { addr, source })?;
    serve_tls_listener(listener, tls, app, shutdown).await
}

/// Serves `app` over HTTPS on an already bound listener until `shutdown` is
/// cancelled. In-flight requests get a grace period before connections close.
pub async fn serve_tls_listener(
    listener: TcpListener,
    tls: RustlsConfig,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), TlsError> {
    let local_addr = listener.local_addr().map_err(TlsError::Serve)?;

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown.cancelled().await;
            info!("shutting down HTTPS listener");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    info!(addr = %local_addr, "HTTPS listening");
    axum_server::from_tcp_rustls(listener, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(TlsError::Serve)
}
