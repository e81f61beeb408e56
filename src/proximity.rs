//! Proximity evaluation against a fixed set of named locations

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{Coordinate, compute_distance};

/// A configured check-in location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    /// Unique within the configured set
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

impl NamedLocation {
    pub fn new(name: &str, latitude: f64, longitude: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            description: description.to_string(),
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Nearest location for one coordinate reading. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    pub nearest: NamedLocation,
    pub distance_meters: f64,
    pub within_radius: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProximityError {
    /// No locations configured; a caller bug, not a runtime condition
    #[error("proximity evaluated against an empty location set")]
    EmptyInput,
}

/// Find the nearest location to `current` and whether it lies within `radius_meters`
///
/// Ties go to the entry that appears first in `locations`.
pub fn evaluate(
    current: Coordinate,
    locations: &[NamedLocation],
    radius_meters: f64,
) -> Result<ProximityResult, ProximityError> {
    let mut best: Option<(&NamedLocation, f64)> = None;

    for location in locations {
        let d = compute_distance(current, location.coordinate());
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((location, d)),
        }
    }

    let (nearest, distance_meters) = best.ok_or(ProximityError::EmptyInput)?;

    Ok(ProximityResult {
        nearest: nearest.clone(),
        distance_meters,
        within_radius: distance_meters <= radius_meters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CHECKIN_RADIUS_METERS;

    fn campuses() -> Vec<NamedLocation> {
        vec![
            NamedLocation::new("南大沢", 35.6235, 139.3765, "本部"),
            NamedLocation::new("日野", 35.6616, 139.3665, "システムデザイン学部"),
            NamedLocation::new("荒川", 35.7500, 139.7719, "健康福祉学部"),
        ]
    }

    #[test]
    fn test_colocated_with_second_location() {
        let locations = campuses();
        let here = locations[1].coordinate();
        let result = evaluate(here, &locations, CHECKIN_RADIUS_METERS).unwrap();
        assert_eq!(result.nearest.name, "日野");
        assert_eq!(result.distance_meters, 0.0);
        assert!(result.within_radius);
    }

    #[test]
    fn test_colocated_within_any_positive_radius() {
        let locations = campuses();
        for location in &locations {
            let result = evaluate(location.coordinate(), &locations, 0.001).unwrap();
            assert_eq!(result.nearest.name, location.name);
            assert!(result.within_radius);
        }
    }

    #[test]
    fn test_out_of_range_still_reports_nearest() {
        let locations = campuses();
        // 5 km due south of Minami-Osawa; Hino is ~4.3 km north of it, so
        // this point is more than 5 km from every campus
        let here = locations[0].coordinate().offset_meters(-5000.0, 0.0);
        let result = evaluate(here, &locations, CHECKIN_RADIUS_METERS).unwrap();
        assert_eq!(result.nearest.name, "南大沢");
        assert!((result.distance_meters - 5000.0).abs() < 1.0);
        assert!(!result.within_radius);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let locations = campuses();
        let here = locations[2].coordinate().offset_meters(500.0, 0.0);
        let d = compute_distance(here, locations[2].coordinate());
        let result = evaluate(here, &locations, d).unwrap();
        assert!(result.within_radius);
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let a = NamedLocation::new("first", 35.0, 139.0, "");
        let b = NamedLocation::new("second", 35.0, 139.0, "");
        let result = evaluate(Coordinate::new(35.1, 139.1), &[a, b], 10.0).unwrap();
        assert_eq!(result.nearest.name, "first");
    }

    #[test]
    fn test_empty_locations_fail() {
        let result = evaluate(Coordinate::new(35.0, 139.0), &[], 1000.0);
        assert_eq!(result, Err(ProximityError::EmptyInput));
    }
}
