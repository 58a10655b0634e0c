//! Coordinates and inbound location reports

use crate::ValidationError;

/// A WGS84 point in decimal degrees
///
/// Always finite and within range; construct through [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a validated point
    ///
    /// # Examples
    ///
    /// ```
    /// use geofence_domain::GeoPoint;
    ///
    /// let central_park = GeoPoint::new(40.7831, -73.9712).unwrap();
    /// assert_eq!(central_park.latitude(), 40.7831);
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A single position report from a device
///
/// Validated at the boundary: the engine never sees an empty device id or an
/// out-of-range coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    device_id: String,
    location: GeoPoint,
}

impl LocationReport {
    /// Create a validated report
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyDeviceId`] for a blank id, or the
    /// coordinate error from [`GeoPoint::new`].
    pub fn new(
        device_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ValidationError> {
        let device_id = device_id.into();
        if device_id.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(Self {
            device_id,
            location: GeoPoint::new(latitude, longitude)?,
        })
    }

    /// Reporting device
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Reported position
    pub fn location(&self) -> GeoPoint {
        self.location
    }
}
