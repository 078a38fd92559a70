pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "freezer")]
#[command(about = "Client for the freezer encrypted, versioned backup service")]
pub struct Args {
    /// Server URI, e.g. https://backup.example.com:8040 (overrides config `host`)
    #[arg(long, global = true)]
    pub host: Option<Url>,

    /// Account name (overrides config `user`)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "FREEZER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Passphrase for file name encryption
    #[arg(long, global = true, env = "FREEZER_CRYPTO_PASS", hide_env_values = true)]
    pub crypto_pass: Option<String>,

    /// Client certificate (PEM) for mutual TLS
    #[arg(long, global = true)]
    pub tls_cert: Option<PathBuf>,

    /// Private key (PEM) for mutual TLS
    #[arg(long, global = true)]
    pub tls_key: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to the freezer config directory (defaults to ~/.freezer)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
