//! Geofence Server
//!
//! HTTP front end for the transition engine: receives device location
//! reports, evaluates them and returns the containment result. Exit events go
//! to the sink selected in configuration.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod handlers;

use config::{ServerConfig, SinkConfig};
use geofence_domain::EventSink;
use geofence_engine::sinks::{LoggingEventSink, WebhookEventSink};
use geofence_engine::TransitionEngine;
use geofence_store::{SqliteStore, StoreError};
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage initialisation error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Event sink construction error
    #[error("Event sink error: {0}")]
    Sink(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when `debug` is true.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the event sink described by `config`
pub fn build_sink(config: &SinkConfig) -> Result<Arc<dyn EventSink>, ServerError> {
    match config {
        SinkConfig::Log => Ok(Arc::new(LoggingEventSink::new())),
        SinkConfig::Webhook { url, .. } => {
            let sink = WebhookEventSink::new(url.clone(), config.timeout())
                .map_err(|e| ServerError::Sink(e.to_string()))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Open the store, seed the catalog and assemble the engine
pub fn build_engine(config: &ServerConfig) -> Result<Arc<TransitionEngine>, ServerError> {
    let store = Arc::new(SqliteStore::open(&config.database_path)?);

    let seeds = config.seed_regions()?;
    for region in &seeds {
        store.upsert_region(region)?;
    }
    info!("Seeded {} geofences", seeds.len());

    let sink = build_sink(&config.sink)?;
    Ok(Arc::new(TransitionEngine::new(store.clone(), store, sink)))
}

/// Start the HTTP server
///
/// Validates configuration, builds the engine and serves until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting geofence server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Event sink: {:?}", config.sink);

    let engine = build_engine(&config)?;
    let app = create_router(AppState {
        engine: Arc::clone(&engine),
    });

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped. Final metrics:\n{}", engine.metrics().snapshot().summary());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
