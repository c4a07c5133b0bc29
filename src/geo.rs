//! Geographic primitives: points and Haversine distance.
//!
//! All coordinates in this crate are WGS84 `(lat, lng)` degrees. Every
//! component that needs a coordinate pair (orders, drivers, grid cells,
//! restricted-area polygons, router waypoints) goes through [`Point`] so the
//! three wire encodings accepted at the Route Enhancement boundary never
//! leak further inward than `routing::parse_stop`.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate. `lat`/`lng` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = Point::new(24.70, 46.60);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn known_distance_riyadh_to_jeddah_is_roughly_correct() {
        let riyadh = Point::new(24.7136, 46.6753);
        let jeddah = Point::new(21.4858, 39.1925);
        let d = haversine_km(riyadh, jeddah);
        // Straight-line distance is ~850km; allow a wide tolerance since we
        // only care that the formula is wired correctly, not geodesy precision.
        assert!((700.0..950.0).contains(&d), "unexpected distance: {d}");
    }
}
