//! Geofence server binary
//!
//! Loads configuration and serves the location-check endpoint.

use anyhow::Context;
use clap::Parser;
use geofence_server::{cli::Cli, config::ServerConfig, init_tracing, start_server};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            eprintln!("Warning: No config file specified, using defaults");
            eprintln!("Usage: geofence-server --config <path-to-config.toml>");
            ServerConfig::default()
        }
    };

    config.apply_env_overrides()?;
    if let Some(bind) = &cli.bind {
        config.set_bind_addr(bind)?;
    }
    if cli.debug {
        config.debug = true;
    }

    init_tracing(config.debug);
    start_server(config).await?;

    Ok(())
}
