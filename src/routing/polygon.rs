//! Point-in-polygon test for restricted areas (§4.3), using the ray-casting
//! rule referenced in §8: an edge crosses the horizontal ray through the test
//! point exactly when its endpoints straddle the point's latitude.
//!
//! §9 leaves true line–polygon intersection on the router's returned geometry
//! as an open question scoped out of this crate; only point-in-polygon
//! filtering of stops is implemented.

use crate::geo::Point;

/// `true` if `point` lies inside `polygon` (implicitly closed: the last
/// vertex connects back to the first).
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.lat > point.lat) != (pj.lat > point.lat) {
            let x_intersect = (pj.lng - pi.lng) * (point.lat - pi.lat) / (pj.lat - pi.lat) + pi.lng;
            if point.lng < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
