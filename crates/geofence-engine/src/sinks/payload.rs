use geofence_domain::BoundaryEvent;
use serde::{Deserialize, Serialize};

/// JSON shape of a boundary event on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Unique event id (UUIDv7)
    pub event_id: String,
    /// Always `fence_exit` today
    pub event_type: String,
    /// Device that crossed
    pub device_id: String,
    /// Latitude at the crossing
    pub latitude: f64,
    /// Longitude at the crossing
    pub longitude: f64,
    /// Vacated region name, `null` if it is no longer in the catalog
    pub geofence_name: Option<String>,
    /// Milliseconds since Unix epoch
    pub timestamp_ms: u64,
}

impl From<&BoundaryEvent> for EventPayload {
    fn from(event: &BoundaryEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            event_type: event.kind.as_str().to_string(),
            device_id: event.device_id.clone(),
            latitude: event.location.latitude(),
            longitude: event.location.longitude(),
            geofence_name: event.geofence_name.clone(),
            timestamp_ms: event.timestamp_ms,
        }
    }
}
