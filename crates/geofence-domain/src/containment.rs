//! Spatial containment testing
//!
//! Great-circle distance via the haversine formula on a spherical Earth.
//! Containment is boundary-inclusive and regions are tested in the order the
//! catalog supplies them: the first containing region wins.

use crate::{GeoPoint, GeofenceRegion};

/// Mean Earth radius used for every distance computation
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres
///
/// # Examples
///
/// ```
/// use geofence_domain::{haversine_distance_km, GeoPoint};
///
/// let nyc = GeoPoint::new(40.7128, -74.0060).unwrap();
/// let la = GeoPoint::new(34.0522, -118.2437).unwrap();
/// let d = haversine_distance_km(nyc, la);
/// assert!(d > 3900.0 && d < 4000.0);
/// ```
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `point` lies within `region` (distance <= radius)
pub fn contains(region: &GeofenceRegion, point: GeoPoint) -> bool {
    haversine_distance_km(point, region.center()) <= region.radius_km()
}

/// Return the first region in iteration order that contains `point`
///
/// Overlapping regions are not ranked; callers that need deterministic
/// results must supply a deterministically ordered slice.
pub fn find_containing(point: GeoPoint, regions: &[GeofenceRegion]) -> Option<&GeofenceRegion> {
    regions.iter().find(|region| contains(region, point))
}

/// Stateless containment tester
///
/// Exists so the engine can hold its spatial strategy as a value alongside
/// its other collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentTester;

impl ContainmentTester {
    /// Create a tester
    pub fn new() -> Self {
        Self
    }

    /// See [`find_containing`]
    pub fn find_containing<'a>(
        &self,
        point: GeoPoint,
        regions: &'a [GeofenceRegion],
    ) -> Option<&'a GeofenceRegion> {
        find_containing(point, regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeofenceId;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn region(id: i64, name: &str, lat: f64, lon: f64, radius_km: f64) -> GeofenceRegion {
        GeofenceRegion::new(GeofenceId::new(id), name, point(lat, lon), radius_km).unwrap()
    }

    #[test]
    fn test_distance_same_point() {
        let p = point(40.7831, -73.9712);
        assert_eq!(haversine_distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_known_points() {
        let d = haversine_distance_km(point(40.7128, -74.0060), point(34.0522, -118.2437));
        assert!(3900.0 < d && d < 4000.0, "NYC-LA distance was {}", d);
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let d = haversine_distance_km(point(0.0, 0.0), point(1.0, 0.0));
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_distance_antipodal() {
        let d = haversine_distance_km(point(0.0, 0.0), point(0.0, 180.0));
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_find_containing_inside() {
        let regions = vec![region(1, "Test Field", 40.7831, -73.9712, 2.0)];
        let found = find_containing(point(40.7831, -73.9712), &regions);
        assert_eq!(found.map(|r| r.name()), Some("Test Field"));
    }

    #[test]
    fn test_find_containing_outside() {
        let regions = vec![region(1, "Test Field", 40.7831, -73.9712, 0.1)];
        assert!(find_containing(point(41.0, -74.0), &regions).is_none());
    }

    #[test]
    fn test_find_containing_first_match_wins() {
        let regions = vec![
            region(1, "First Field", 40.7831, -73.9712, 5.0),
            region(2, "Second Field", 40.7831, -73.9712, 10.0),
        ];
        let p = point(40.7831, -73.9712);
        for _ in 0..10 {
            assert_eq!(find_containing(p, &regions).map(|r| r.id()), Some(GeofenceId::new(1)));
        }

        let reversed: Vec<_> = regions.into_iter().rev().collect();
        assert_eq!(find_containing(p, &reversed).map(|r| r.id()), Some(GeofenceId::new(2)));
    }

    #[test]
    fn test_find_containing_skips_non_matching_prefix() {
        let regions = vec![
            region(1, "Far Away", -33.8688, 151.2093, 1.0),
            region(2, "Home", 40.7831, -73.9712, 1.0),
        ];
        let found = find_containing(point(40.7831, -73.9712), &regions);
        assert_eq!(found.map(|r| r.name()), Some("Home"));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = point(10.0, 20.0);
        let edge = point(10.5, 20.0);
        let exact = haversine_distance_km(edge, center);
        let regions = vec![GeofenceRegion::new(GeofenceId::new(1), "edge", center, exact).unwrap()];
        assert!(find_containing(edge, &regions).is_some());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(ContainmentTester::new().find_containing(point(0.0, 0.0), &[]).is_none());
    }
}
