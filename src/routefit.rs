//! Route-Fit (§4.1.3, resolved per §9's open question): cheapest-insertion
//! test for whether a new BULLET order's pickup/dropoff pair can be spliced
//! into a driver's existing ordered stop list without exceeding the detour
//! budget.
//!
//! The source left this as a random placeholder; this crate picks the
//! concrete policy §9 suggests — minimum-cost insertion over the existing
//! stop order, respecting that a pickup must precede its own dropoff.

use crate::geo::{haversine_km, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteFitResult {
    pub fits: bool,
    pub detour_km: f64,
    pub original_distance_km: f64,
    pub new_distance_km: f64,
}

/// Maximum acceptable detour for a BULLET batching probe (§4.1.1/§8).
pub const MAX_BATCH_DETOUR_KM: f64 = 5.0;

fn path_distance(stops: &[Point]) -> f64 {
    stops.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// `existing_stops` is the driver's current ordered route (starting from
/// their live location). Evaluates every `(pickup_index, dropoff_index)`
/// insertion with `pickup_index <= dropoff_index` and keeps the cheapest.
pub fn evaluate_route_fit(
    existing_stops: &[Point],
    new_pickup: Point,
    new_dropoff: Point,
) -> RouteFitResult {
    let original_distance_km = path_distance(existing_stops);

    if existing_stops.is_empty() {
        // Nothing to splice into: the new trip is inserted wholesale.
        let new_distance_km = haversine_km(new_pickup, new_dropoff);
        let detour_km = new_distance_km;
        return RouteFitResult {
            fits: detour_km <= MAX_BATCH_DETOUR_KM,
            detour_km,
            original_distance_km,
            new_distance_km,
        };
    }

    let mut best_distance_km = f64::INFINITY;
    let n = existing_stops.len();

    for pickup_at in 0..=n {
        for dropoff_at in pickup_at..=n {
            let mut candidate = Vec::with_capacity(n + 2);
            candidate.extend_from_slice(&existing_stops[..pickup_at]);
            candidate.push(new_pickup);
            candidate.extend_from_slice(&existing_stops[pickup_at..dropoff_at]);
            candidate.push(new_dropoff);
            candidate.extend_from_slice(&existing_stops[dropoff_at..]);

            let distance = path_distance(&candidate);
            if distance < best_distance_km {
                best_distance_km = distance;
            }
        }
    }

    let detour_km = best_distance_km - original_distance_km;
    RouteFitResult {
        fits: detour_km <= MAX_BATCH_DETOUR_KM,
        detour_km,
        original_distance_km,
        new_distance_km: best_distance_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_route_detour_is_trip_distance() {
        let pickup = Point::new(0.0, 0.0);
        let dropoff = Point::new(0.0, 0.01);
        let result = evaluate_route_fit(&[], pickup, dropoff);
        assert!((result.detour_km - result.new_distance_km).abs() < 1e-9);
    }

    #[test]
    fn inserting_along_the_way_has_small_detour() {
        // Existing route goes straight east; inserting a pickup/dropoff pair
        // that sits right on that line should cost ~0 extra distance.
        let existing = vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)];
        let pickup = Point::new(0.0, 0.3);
        let dropoff = Point::new(0.0, 0.6);
        let result = evaluate_route_fit(&existing, pickup, dropoff);
        assert!(result.detour_km < 0.5, "detour was {}", result.detour_km);
        assert!(result.fits);
    }

    #[test]
    fn boundary_detour_of_exactly_five_km_accepted() {
        // Construct a case where the cheapest insertion costs exactly the
        // 5km boundary (within floating tolerance) to exercise the <= rule.
        let existing = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0)];
        // 1 degree of longitude at the equator is ~111.32km; we want a
        // detour of exactly 5km there-and-back, i.e. ~2.5km each way.
        let delta_deg = 2.5 / 111.32;
        let pickup = Point::new(0.0, delta_deg);
        let dropoff = Point::new(0.0, delta_deg);
        let result = evaluate_route_fit(&existing, pickup, dropoff);
        assert!((result.detour_km - 5.0).abs() < 0.05, "detour was {}", result.detour_km);
        assert!(result.fits);
    }

    #[test]
    fn large_detour_rejected() {
        let existing = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.01)];
        let pickup = Point::new(5.0, 5.0);
        let dropoff = Point::new(5.1, 5.1);
        let result = evaluate_route_fit(&existing, pickup, dropoff);
        assert!(!result.fits);
    }
}
