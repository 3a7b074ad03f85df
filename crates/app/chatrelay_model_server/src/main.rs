//! Chatrelay model service binary.
//!
//! Serves `/health` and `/chat` over HTTPS. Each chat request is answered by a
//! single OpenAI chat completion. `OPENAI_API_KEY` must be set.

use std::path::PathBuf;
use std::sync::Arc;

use chatrelay_api::config::{
    DEFAULT_TLS_CERT_PATH, DEFAULT_TLS_KEY_PATH, ModelServiceConfig, TlsPaths,
};
use chatrelay_core::completion::openai::{OPENAI_API_BASE_URL, OpenAiProvider};
use chatrelay_core::completion::{
    CompletionSettings, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI arguments for the model service.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_model_server", about = "Chatrelay model service", version)]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "MODEL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "MODEL_PORT", default_value_t = 8000)]
    port: u16,

    /// PEM private key.
    #[arg(long, env = "TLS_KEY_PATH", default_value = DEFAULT_TLS_KEY_PATH)]
    tls_key: PathBuf,

    /// PEM certificate.
    #[arg(long, env = "TLS_CERT_PATH", default_value = DEFAULT_TLS_CERT_PATH)]
    tls_cert: PathBuf,

    /// OpenAI-compatible API base URL.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_API_BASE_URL)]
    openai_base_url: String,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Chat model.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum completion tokens.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,
}

impl Args {
    fn settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn into_config(self) -> ModelServiceConfig {
        ModelServiceConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            tls: TlsPaths {
                cert: self.tls_cert,
                key: self.tls_key,
            },
            openai_base_url: self.openai_base_url,
            openai_api_key: self.openai_api_key,
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

    let args = Args::parse();
    let settings = args.settings();
    let config = args.into_config();

    info!(
        model = %settings.model,
        base_url = %config.openai_base_url,
        "configuring completion provider"
    );
    let provider = OpenAiProvider::new(reqwest::Client::new(), &config.openai_api_key, settings)?
        .with_base_url(&config.openai_base_url);

    let app = chatrelay_api::model_router(chatrelay_api::ModelState::new(Arc::new(provider)));
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

    info!(addr = %config.bind_addr, "HTTPS model service starting");
    chatrelay_api::tls::serve_tls(&config.bind_addr, tls, app, shutdown).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_port_8000_and_openai_settings() {
        let args = Args::parse_from(["chatrelay_model_server", "--openai-api-key", "sk-test"]);
        assert_eq!(args.settings(), CompletionSettings::default());

        let config = args.into_config();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.openai_base_url, OPENAI_API_BASE_URL);
        assert_eq!(config.tls, TlsPaths::default());
    }

    #[test]
    fn args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
