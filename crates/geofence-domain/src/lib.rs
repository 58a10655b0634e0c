//! Geofence Domain Layer
//!
//! Core value types, the containment test, and the trait interfaces that every
//! other layer of the geofence service depends upon. Infrastructure (SQLite,
//! HTTP, webhooks) lives in other crates.
//!
//! ## Key Concepts
//!
//! - **Geofence region**: a circular area with a centre and a radius in kilometres
//! - **Containment**: great-circle (haversine) distance to the centre is within the radius
//! - **Device state**: the last known position and containment of one device
//! - **Transition**: a change in containment between two consecutive evaluations
//! - **Boundary event**: the notification emitted when a device exits all regions
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Validation happens when values are constructed, so the engine only ever
//!   sees well-formed coordinates and radii
//! - Trait definitions for the catalog, state store and event sink

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod containment;
pub mod device_state;
pub mod error;
pub mod event;
pub mod location;
pub mod region;
pub mod time;
pub mod traits;
pub mod transition;

// Re-exports for convenience
pub use containment::{find_containing, haversine_distance_km, ContainmentTester, EARTH_RADIUS_KM};
pub use device_state::DeviceState;
pub use error::ValidationError;
pub use event::{BoundaryEvent, BoundaryEventKind};
pub use location::{GeoPoint, LocationReport};
pub use region::{GeofenceId, GeofenceRegion};
pub use traits::{
    CatalogUnavailable, DeviceStateStore, EventSink, GeofenceCatalog, SinkUnavailable,
    StoreUnavailable,
};
pub use transition::{TransitionKind, TransitionResult};
