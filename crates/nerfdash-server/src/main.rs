//! Standalone server binary; the CLI's `serve` subcommand wraps the same
//! entry point.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nerfdash_server::{serve, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Optional YAML config next to the binary; flags live on the CLI.
    let config_path = PathBuf::from("nerfdash.yaml");
    let config = if config_path.exists() {
        ServerConfig::from_file(&config_path)?
    } else {
        ServerConfig::default()
    };

    serve(config).await
}
