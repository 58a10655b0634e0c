//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the transition engine and
//! infrastructure. Implementations live in other crates and are injected into
//! the engine at construction time.

use crate::{BoundaryEvent, DeviceState, GeofenceRegion};
use async_trait::async_trait;
use thiserror::Error;

/// The geofence catalog could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("geofence catalog unavailable: {0}")]
pub struct CatalogUnavailable(pub String);

/// The device state store could not be read or written
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("device state store unavailable: {0}")]
pub struct StoreUnavailable(pub String);

/// The event sink rejected or could not receive an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event sink unavailable: {0}")]
pub struct SinkUnavailable(pub String);

/// Source of active geofence regions
///
/// Implemented by the infrastructure layer (geofence-store)
#[async_trait]
pub trait GeofenceCatalog: Send + Sync {
    /// List every active region in a stable order
    ///
    /// The order is observable: containment picks the first match.
    async fn list_active(&self) -> Result<Vec<GeofenceRegion>, CatalogUnavailable>;
}

/// Durable mapping from device id to its last state
///
/// Implemented by the infrastructure layer (geofence-store)
#[async_trait]
pub trait DeviceStateStore: Send + Sync {
    /// Get the state for a device, if it has ever been evaluated
    async fn get(&self, device_id: &str) -> Result<Option<DeviceState>, StoreUnavailable>;

    /// Insert or replace the state for `state.device_id()`
    async fn upsert(&self, state: &DeviceState) -> Result<(), StoreUnavailable>;
}

/// Downstream delivery of boundary events
///
/// Implemented by the engine layer (logging, webhook, channel sinks)
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event; implementations do not retry
    async fn publish(&self, event: &BoundaryEvent) -> Result<(), SinkUnavailable>;
}
