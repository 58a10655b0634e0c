//! Circular geofence regions

use crate::{GeoPoint, ValidationError};
use std::fmt;

/// Stable identifier of a geofence region, assigned by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeofenceId(i64);

impl GeofenceId {
    /// Wrap a raw catalog id
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value (for storage)
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for GeofenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A circular geofence
///
/// Immutable once built. Created by an administrative process and only ever
/// read by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceRegion {
    id: GeofenceId,
    name: String,
    center: GeoPoint,
    radius_km: f64,
}

impl GeofenceRegion {
    /// Create a validated region
    ///
    /// # Errors
    /// Returns an error if the name is empty or the radius is not a finite
    /// positive number.
    ///
    /// # Examples
    ///
    /// ```
    /// use geofence_domain::{GeoPoint, GeofenceId, GeofenceRegion};
    ///
    /// let center = GeoPoint::new(40.7831, -73.9712).unwrap();
    /// let region = GeofenceRegion::new(GeofenceId::new(1), "Central Park", center, 2.0).unwrap();
    /// assert_eq!(region.radius_km(), 2.0);
    /// assert!(GeofenceRegion::new(GeofenceId::new(2), "Nowhere", center, 0.0).is_err());
    /// ```
    pub fn new(
        id: GeofenceId,
        name: impl Into<String>,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ValidationError::InvalidRadius(radius_km));
        }
        Ok(Self {
            id,
            name,
            center,
            radius_km,
        })
    }

    /// Region id
    pub fn id(&self) -> GeofenceId {
        self.id
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Centre point
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Radius in kilometres
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}
