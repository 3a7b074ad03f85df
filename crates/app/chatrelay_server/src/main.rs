//! Chatrelay relay server binary.
//!
//! Serves `/api/health` and `/api/chat` over HTTPS with a self-signed
//! certificate pair. With `--integration` the chat endpoint forwards to the
//! model service instead of answering with a placeholder.

use std::path::PathBuf;

use chatrelay_api::config::{
    DEFAULT_TLS_CERT_PATH, DEFAULT_TLS_KEY_PATH, DEFAULT_UPSTREAM_URL, Integration, RelayConfig,
    TlsPaths,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_server", about = "Chatrelay HTTPS relay server", version)]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "RELAY_PORT", default_value_t = 5000)]
    port: u16,

    /// PEM private key.
    #[arg(long, env = "TLS_KEY_PATH", default_value = DEFAULT_TLS_KEY_PATH)]
    tls_key: PathBuf,

    /// PEM certificate.
    #[arg(long, env = "TLS_CERT_PATH", default_value = DEFAULT_TLS_CERT_PATH)]
    tls_cert: PathBuf,

    /// Forward chat messages to the model service instead of replying with a
    /// placeholder.
    #[arg(long, env = "INTEGRATION_ENABLED", default_value_t = false)]
    integration: bool,

    /// Model service chat endpoint (certificate validation is disabled).
    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: Url,
}

impl Args {
    fn into_config(self) -> RelayConfig {
        RelayConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            tls: TlsPaths {
                cert: self.tls_cert,
                key: self.tls_key,
            },
            integration: Integration::from_flag(self.integration, self.upstream_url),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chatrelay_api=debug,chatrelay_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config();

    match &config.integration {
        Integration::Enabled { upstream_url } => {
            info!(upstream = %upstream_url, "model service integration enabled");
        }
        Integration::Disabled => {
            info!("model service integration disabled, replying with placeholder");
        }
    }

    let state = chatrelay_api::RelayState::from_config(&config)?;
    let app = chatrelay_api::relay_router(state);
    let tls = chatrelay_api::tls::load_tls(&config.tls).await?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for ctrl-c: {e}");
                return;
            }
            shutdown.cancel();
        }
    });

    info!(
        addr = %config.bind_addr,
        integration = config.integration.is_enabled(),
        "HTTPS relay starting"
    );
    chatrelay_api::tls::serve_tls(&config.bind_addr, tls, app, shutdown).await?;

    Ok(())
}
