//! Persisted per-device containment state

use crate::{GeoPoint, GeofenceId};

/// Last evaluated state of one device
///
/// One row per device id. Only the transition engine writes these.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    device_id: String,
    location: GeoPoint,
    inside: bool,
    geofence_id: Option<GeofenceId>,
    last_updated_ms: u64,
}

impl DeviceState {
    /// Build a state whose `inside` flag is derived from `geofence_id`
    pub fn new(
        device_id: impl Into<String>,
        location: GeoPoint,
        geofence_id: Option<GeofenceId>,
        last_updated_ms: u64,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            location,
            inside: geofence_id.is_some(),
            geofence_id,
            last_updated_ms,
        }
    }

    /// Device this state belongs to (primary key)
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Position from the most recent evaluation
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    /// Whether the device was inside some region
    pub fn inside(&self) -> bool {
        self.inside
    }

    /// Region that contained the device, if any
    ///
    /// May reference a region that has since left the catalog.
    pub fn geofence_id(&self) -> Option<GeofenceId> {
        self.geofence_id
    }

    /// When the state was written (milliseconds since Unix epoch)
    pub fn last_updated_ms(&self) -> u64 {
        self.last_updated_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_follows_geofence_id() {
        let p = GeoPoint::new(1.0, 2.0).unwrap();
        let inside = DeviceState::new("d", p, Some(GeofenceId::new(3)), 0);
        assert!(inside.inside());
        assert_eq!(inside.geofence_id(), Some(GeofenceId::new(3)));
        assert!(!DeviceState::new("d", p, None, 0).inside());
    }
}
