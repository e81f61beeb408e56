//! Great-circle geometry on a spherical Earth
//!
//! Coordinates are WGS84 decimal degrees. Out-of-range values are not
//! rejected; they simply produce meaningless distances.

use serde::{Deserialize, Serialize};

use crate::consts::EARTH_RADIUS_M;

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Distance to another coordinate in meters
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        compute_distance(*self, *other)
    }

    /// Move by a number of meters north and east (flat-earth approximation,
    /// good enough for offsets of a few kilometers)
    pub fn offset_meters(&self, north: f64, east: f64) -> Coordinate {
        let dlat = north / EARTH_RADIUS_M;
        let dlng = east / (EARTH_RADIUS_M * self.latitude.to_radians().cos());
        Coordinate::new(
            self.latitude + dlat.to_degrees(),
            self.longitude + dlng.to_degrees(),
        )
    }
}

/// Haversine distance between two coordinates (meters)
///
/// Symmetric in its arguments and exactly zero for identical points.
/// NaN inputs propagate to the result.
pub fn compute_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points; clamp keeps NaN
    let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MINAMI_OSAWA: Coordinate = Coordinate::new(35.6235, 139.3765);
    const TOKYO_STATION: Coordinate = Coordinate::new(35.681236, 139.767125);

    #[test]
    fn test_distance_zero_for_same_point() {
        assert_eq!(compute_distance(MINAMI_OSAWA, MINAMI_OSAWA), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        // Minami-Osawa to Tokyo Station is roughly 35.9 km as the crow flies
        let d = compute_distance(MINAMI_OSAWA, TOKYO_STATION);
        assert!((d - 35_870.0).abs() < 300.0, "got {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((compute_distance(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_points() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let half_circumference = EARTH_RADIUS_M * std::f64::consts::PI;
        assert!((compute_distance(a, b) - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Coordinate::new(f64::NAN, 139.0);
        assert!(compute_distance(a, TOKYO_STATION).is_nan());
        assert!(compute_distance(TOKYO_STATION, a).is_nan());

        let b = Coordinate::new(35.0, f64::NAN);
        assert!(compute_distance(b, Coordinate::new(35.0, 139.0)).is_nan());
    }

    #[test]
    fn test_is_finite() {
        assert!(TOKYO_STATION.is_finite());
        assert!(!Coordinate::new(f64::NAN, 139.0).is_finite());
        assert!(!Coordinate::new(35.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_offset_meters() {
        let moved = MINAMI_OSAWA.offset_meters(5000.0, 0.0);
        assert!((compute_distance(MINAMI_OSAWA, moved) - 5000.0).abs() < 1.0);

        let moved = MINAMI_OSAWA.offset_meters(0.0, -3000.0);
        assert!((MINAMI_OSAWA.distance_to(&moved) - 3000.0).abs() < 1.0);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(compute_distance(a, b), compute_distance(b, a));
        }

        #[test]
        fn prop_distance_self_is_zero(a in coordinate()) {
            prop_assert_eq!(compute_distance(a, a), 0.0);
        }

        #[test]
        fn prop_distance_bounded(a in coordinate(), b in coordinate()) {
            let d = compute_distance(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= EARTH_RADIUS_M * std::f64::consts::PI + 1e-6);
        }

        #[test]
        fn prop_nan_never_becomes_a_distance(a in coordinate(), nan_lat in any::<bool>()) {
            let bad = if nan_lat {
                Coordinate::new(f64::NAN, a.longitude)
            } else {
                Coordinate::new(a.latitude, f64::NAN)
            };
            prop_assert!(compute_distance(bad, a).is_nan());
            prop_assert!(compute_distance(a, bad).is_nan());
        }
    }
}
