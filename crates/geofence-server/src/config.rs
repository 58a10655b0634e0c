//! Configuration file parsing for the server.
//!
//! Loads settings from a TOML file, then lets environment variables and
//! command-line flags override individual fields.

use geofence_domain::{GeoPoint, GeofenceId, GeofenceRegion, ValidationError};
use geofence_engine::sinks::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field has an unusable value
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field or variable
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A seeded geofence is malformed
    #[error("Invalid geofence {id}: {source}")]
    Geofence {
        /// Seed id
        id: i64,
        /// Validation failure
        source: ValidationError,
    },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,

    /// Where exit events go
    #[serde(default)]
    pub sink: SinkConfig,

    /// Regions written to the catalog at startup
    #[serde(default)]
    pub geofences: Vec<GeofenceSeed>,
}

/// Event sink selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SinkConfig {
    /// Log events (default)
    #[default]
    Log,

    /// POST events to an HTTP endpoint
    Webhook {
        /// Target URL
        url: String,
        /// Request timeout in seconds (default: 5)
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl SinkConfig {
    /// Request timeout for the webhook sink
    pub fn timeout(&self) -> Duration {
        match self {
            SinkConfig::Log => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            SinkConfig::Webhook { timeout_secs, .. } => Duration::from_secs(*timeout_secs),
        }
    }
}

/// A geofence to seed into the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceSeed {
    /// Catalog id
    pub id: i64,
    /// Region name
    pub name: String,
    /// Centre latitude
    pub center_lat: f64,
    /// Centre longitude
    pub center_lon: f64,
    /// Radius in kilometres
    pub radius_km: f64,
}

impl GeofenceSeed {
    /// Validate and convert into a domain region
    pub fn to_region(&self) -> Result<GeofenceRegion, ConfigError> {
        GeoPoint::new(self.center_lat, self.center_lon)
            .and_then(|center| {
                GeofenceRegion::new(GeofenceId::new(self.id), self.name.clone(), center, self.radius_km)
            })
            .map_err(|source| ConfigError::Geofence { id: self.id, source })
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_database_path() -> String {
    "geofence.db".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            debug: false,
            sink: SinkConfig::default(),
            geofences: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `GEOFENCE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Recognised keys: `GEOFENCE_HOST`, `GEOFENCE_PORT`, `GEOFENCE_DATABASE`,
    /// `GEOFENCE_DEBUG`, `GEOFENCE_WEBHOOK_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GEOFENCE_HOST") {
            self.bind_address = host;
        }
        if let Some(port) = lookup("GEOFENCE_PORT") {
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::invalid("GEOFENCE_PORT", format!("'{}' is not a port", port)))?;
        }
        if let Some(path) = lookup("GEOFENCE_DATABASE") {
            self.database_path = path;
        }
        if let Some(debug) = lookup("GEOFENCE_DEBUG") {
            self.debug = debug.eq_ignore_ascii_case("true") || debug == "1";
        }
        if let Some(url) = lookup("GEOFENCE_WEBHOOK_URL") {
            let timeout_secs = match &self.sink {
                SinkConfig::Webhook { timeout_secs, .. } => *timeout_secs,
                SinkConfig::Log => DEFAULT_TIMEOUT_SECS,
            };
            self.sink = SinkConfig::Webhook { url, timeout_secs };
        }
        Ok(())
    }

    /// Override address and port from an `address:port` string
    pub fn set_bind_addr(&mut self, addr: &str) -> Result<(), ConfigError> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::invalid("bind", format!("'{}' is not address:port", addr)))?;
        self.bind_port = port
            .parse()
            .map_err(|_| ConfigError::invalid("bind", format!("'{}' is not a port", port)))?;
        self.bind_address = host.to_string();
        Ok(())
    }

    /// Check cross-field constraints and every seeded geofence
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::invalid("bind_address", "must not be empty"));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::invalid("database_path", "must not be empty"));
        }
        if let SinkConfig::Webhook { url, timeout_secs } = &self.sink {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid("sink.url", "must be an http(s) URL"));
            }
            if *timeout_secs == 0 {
                return Err(ConfigError::invalid("sink.timeout_secs", "must be greater than zero"));
            }
        }

        let mut seen = HashSet::new();
        for seed in &self.geofences {
            seed.to_region()?;
            if !seen.insert(seed.id) {
                return Err(ConfigError::invalid("geofences", format!("duplicate id {}", seed.id)));
            }
        }
        Ok(())
    }

    /// Validated catalog seeds
    pub fn seed_regions(&self) -> Result<Vec<GeofenceRegion>, ConfigError> {
        self.geofences.iter().map(GeofenceSeed::to_region).collect()
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
