use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_RELAY_URL: &str = "https://localhost:5000";

#[derive(Parser, Debug)]
#[command(name = "chatrelay", version, about = "Terminal chat client for a Chatrelay relay")]
pub struct Cli {
    /// Relay base URL.
    #[arg(long, global = true, env = "CHATRELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub url: String,

    /// Verify the relay's TLS certificate (the relay ships with a self-signed one).
    #[arg(long, global = true, default_value_t = false)]
    pub verify_tls: bool,

    /// Log file (the terminal is reserved for the chat).
    #[arg(long, global = true, default_value = "chatrelay.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive chat (default).
    Chat,
    /// Send one message and print the reply.
    Send {
        /// Message text.
        message: String,
    },
    /// Check that the relay is up.
    Health,
    /// Print the version.
    Version,
}
