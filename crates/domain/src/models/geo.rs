//! Geographic primitives shared by the matching pipeline.

use geo::{HaversineDistance, Point as GeoPoint};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Earth radius used by the Haversine great-circle formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A decimal-degree coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub lat: f64,
    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn as_geo_point(&self) -> GeoPoint<f64> {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Great-circle distance between two coordinates, in kilometers.
///
/// Delegates to `geo`'s `HaversineDistance`, which already uses a radius of
/// 6371 km — the same constant the original service hard-coded.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    a.as_geo_point().haversine_distance(&b.as_geo_point()) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_same_point_is_zero() {
        let p = Coordinate::new(12.9716, 77.5946);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(12.9716, 77.5946);
        let b = Coordinate::new(12.975, 77.599);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_known_distance_bangalore_points() {
        // Roughly half a kilometer apart.
        let a = Coordinate::new(12.9716, 77.5946);
        let b = Coordinate::new(12.975, 77.599);
        let d = haversine_km(a, b);
        assert!(d > 0.3 && d < 1.0, "unexpected distance {d}");
    }

    #[test]
    fn coordinate_validation_rejects_out_of_range() {
        let bad = Coordinate::new(120.0, 0.0);
        assert!(bad.validate().is_err());
    }
}
