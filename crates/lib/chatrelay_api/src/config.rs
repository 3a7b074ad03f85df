//! Server configuration for the relay and the model service.

use std::path::PathBuf;

use url::Url;

/// Default relay upstream (the model service's chat endpoint).
pub const DEFAULT_UPSTREAM_URL: &str = "https://localhost:8000/chat";
/// Default self-signed private key path.
pub const DEFAULT_TLS_KEY_PATH: &str = "ssl/selfsigned.key";
/// Default self-signed certificate path.
pub const DEFAULT_TLS_CERT_PATH: &str = "ssl/selfsigned.crt";

/// PEM certificate pair used to serve HTTPS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl Default for TlsPaths {
    fn default() -> Self {
        Self {
            cert: DEFAULT_TLS_CERT_PATH.into(),
            key: DEFAULT_TLS_KEY_PATH.into(),
        }
    }
}

/// Selects between the placeholder reply and the live upstream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Integration {
    #[default]
    Disabled,
    Enabled { upstream_url: Url },
}

impl Integration {
    /// Builds the integration setting from the on/off flag and the upstream URL.
    pub fn from_flag(enabled: bool, upstream_url: Url) -> Self {
        if enabled {
            Self::Enabled { upstream_url }
        } else {
            Self::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

/// Configuration for the relay server.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Address to bind the HTTPS listener (e.g. "0.0.0.0:5000").
    pub bind_addr: String,
    pub tls: TlsPaths,
    pub integration: Integration,
}

/// Configuration for the model service.
#[derive(Clone, Debug)]
pub struct ModelServiceConfig {
    /// Address to bind the HTTPS listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    pub tls: TlsPaths,
    /// OpenAI-compatible API base URL.
    pub openai_base_url: String,
    pub openai_api_key: String,
}
