//! Validation errors raised when constructing domain values

use thiserror::Error;

/// Rejection of a malformed coordinate, region or report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Device id is empty or whitespace only
    #[error("device_id must not be empty")]
    EmptyDeviceId,

    /// Latitude outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// NaN or infinite coordinate
    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,

    /// Radius not strictly positive
    #[error("radius {0} km must be greater than zero")]
    InvalidRadius(f64),

    /// Region name is empty
    #[error("geofence name must not be empty")]
    EmptyName,
}
