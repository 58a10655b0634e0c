//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Geofence server - evaluates device locations against circular geofences.
#[derive(Debug, Parser)]
#[command(name = "geofence-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "GEOFENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override bind address (e.g., 127.0.0.1:8000)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
