//! Map center coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Current map center, the anchor for collection growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that the coordinates are finite WGS84 degrees.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} outside [-90, 90]", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} outside [-180, 180]", self.lon));
        }
        Ok(())
    }

    /// Great-circle distance in metres (haversine).
    pub fn distance_m(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{} vs {}", a, b);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let berlin = Location::new(52.516389, 13.377778);
        assert_close(berlin.distance_m(&berlin), 0.0, 1e-9);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(1.0, 0.0);
        assert_close(a.distance_m(&b), 111_195.0, 5.0);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Location::new(52.5, 13.4).validate().is_ok());
        assert!(Location::new(91.0, 0.0).validate().is_err());
        assert!(Location::new(0.0, -181.0).validate().is_err());
        assert!(Location::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_display_matches_geosearch_format() {
        assert_eq!(Location::new(52.5, 13.25).to_string(), "52.5|13.25");
    }
}
