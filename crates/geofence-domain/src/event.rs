//! Boundary-crossing events handed to the event sink

use crate::GeoPoint;

/// Kind of boundary crossing
///
/// Entries are deliberately not published; see [`crate::TransitionKind::publishes_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryEventKind {
    /// Device left every region
    Exit,
}

impl BoundaryEventKind {
    /// Wire name of the event kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryEventKind::Exit => "fence_exit",
        }
    }
}

/// Notification that a device crossed a region boundary
///
/// Built fresh for each exit and never persisted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryEvent {
    /// Unique event id (UUIDv7) for downstream deduplication
    pub event_id: String,

    /// Kind of crossing
    pub kind: BoundaryEventKind,

    /// Device that crossed
    pub device_id: String,

    /// Position at which the crossing was observed
    pub location: GeoPoint,

    /// Name of the region just vacated
    ///
    /// `None` when the region was removed from the catalog since the device
    /// entered it.
    pub geofence_name: Option<String>,

    /// Observation time (milliseconds since Unix epoch)
    pub timestamp_ms: u64,
}

impl BoundaryEvent {
    /// Build an exit event with a freshly generated id
    pub fn exit(
        device_id: impl Into<String>,
        location: GeoPoint,
        geofence_name: Option<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::now_v7().to_string(),
            kind: BoundaryEventKind::Exit,
            device_id: device_id.into(),
            location,
            geofence_name,
            timestamp_ms,
        }
    }
}
