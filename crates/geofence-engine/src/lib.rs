//! Geofence Transition Engine
//!
//! Evaluates location reports against the geofence catalog, detects
//! containment transitions per device, persists the new device state and
//! publishes a boundary event on every exit.
//!
//! # Overview
//!
//! For each report the engine:
//! 1. Takes the per-device lock (reports for other devices run concurrently)
//! 2. Reads the active catalog and the device's prior state
//! 3. Finds the first containing region (haversine, boundary-inclusive)
//! 4. On an inside → outside transition, publishes one exit event
//! 5. Writes the new device state, whether or not anything changed
//! 6. Releases the lock and returns a [`TransitionResult`]
//!
//! Exit events are published *before* the state write. A failed publish
//! leaves the prior state untouched so a retry re-detects the exit; a failed
//! write after a successful publish fails the call, and a retry may publish
//! the exit a second time.
//!
//! # Usage
//!
//! ```no_run
//! use geofence_domain::LocationReport;
//! use geofence_engine::{sinks::LoggingEventSink, TransitionEngine};
//! use geofence_store::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("geofence.db")?);
//!     let engine = TransitionEngine::new(store.clone(), store, Arc::new(LoggingEventSink::new()));
//!
//!     let report = LocationReport::new("tractor-7", 40.7831, -73.9712)?;
//!     let result = engine.evaluate(&report).await?;
//!     println!("inside: {}, changed: {}", result.inside, result.state_changed);
//!     Ok(())
//! }
//! ```
//!
//! [`TransitionResult`]: geofence_domain::TransitionResult

#![warn(missing_docs)]

mod engine;
mod error;
mod locks;
mod metrics;
pub mod sinks;

pub use engine::TransitionEngine;
pub use error::{EngineError, EvaluationCause};
pub use locks::{DeviceGuard, DeviceLocks};
pub use metrics::{EngineMetrics, MetricsSnapshot};
