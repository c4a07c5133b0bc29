//! Multi-factor scoring (§4.1.2): proximity/availability/performance/capacity
//! /efficiency/fatigue sub-scores, combined per tier weights into a single
//! `totalScore`. Grounded in the reference crate's `matching::policy` module,
//! which shapes a similar weighted-component score (`MatchingScoreComponents`)
//! before summing; this version generalizes it to the tier-specific weight
//! tables spec'd in §4.1.2 rather than a single fixed formula.

use crate::config::{BarqWeights, BulletWeights};
use crate::model::{Driver, EstimatedAvailability, FatigueLevel, ServiceType};

/// `proximity(d, maxD) = exp(-d / (0.5*maxD))`.
pub fn proximity_score(distance_km: f64, max_distance_km: f64) -> f64 {
    (-distance_km / (0.5 * max_distance_km)).exp()
}

/// BARQ: `max(0, 1 - w/10)`. BULLET: `max(0, 1 - w/30)`, where `w` is minutes
/// until available (`0` if already immediate).
pub fn availability_score(availability: EstimatedAvailability, now_ms: u64, tier: ServiceType) -> f64 {
    if matches!(availability, EstimatedAvailability::Immediate) {
        return 1.0;
    }
    let w = availability.minutes_until(now_ms);
    let denom = match tier {
        ServiceType::Barq => 10.0,
        ServiceType::Bullet => 30.0,
    };
    (1.0 - w / denom).max(0.0)
}

pub fn performance_score(performance_rating: f64) -> f64 {
    performance_rating
}

pub fn fatigue_score(level: FatigueLevel) -> f64 {
    level.sub_score()
}

pub fn capacity_score(remaining: i32, max_capacity: i32) -> f64 {
    if max_capacity <= 0 {
        return 0.0;
    }
    (remaining as f64 / max_capacity as f64).clamp(0.0, 1.0)
}

/// Components and the weighted total for a single BARQ candidate.
#[derive(Debug, Clone, Copy)]
pub struct BarqScore {
    pub proximity: f64,
    pub availability: f64,
    pub performance: f64,
    pub fatigue: f64,
    pub total: f64,
}

pub fn score_barq_candidate(
    driver: &Driver,
    distance_km: f64,
    now_ms: u64,
    weights: &BarqWeights,
) -> BarqScore {
    let proximity = proximity_score(distance_km, 5.0);
    let availability = availability_score(driver.estimated_availability, now_ms, ServiceType::Barq);
    let performance = performance_score(driver.performance.rating);
    let fatigue = fatigue_score(driver.fatigue);
    let total = weights.proximity * proximity
        + weights.availability * availability
        + weights.performance * performance
        + weights.fatigue * fatigue;
    BarqScore {
        proximity,
        availability,
        performance,
        fatigue,
        total,
    }
}

/// Components and the weighted total for a single BULLET candidate.
/// `efficiency` is the estimated route-improvement from adding this order to
/// the driver's existing trip (`0.0` when unmeasurable, e.g. the driver has
/// no existing BULLET stops to improve on).
#[derive(Debug, Clone, Copy)]
pub struct BulletScore {
    pub proximity: f64,
    pub capacity: f64,
    pub efficiency: f64,
    pub fatigue: f64,
    pub total: f64,
}

pub fn score_bullet_candidate(
    driver: &Driver,
    distance_km: f64,
    efficiency: f64,
    weights: &BulletWeights,
) -> BulletScore {
    let proximity = proximity_score(distance_km, 20.0);
    let capacity = capacity_score(driver.capacity.bullet, crate::model::MAX_BULLET_CAPACITY);
    let fatigue = fatigue_score(driver.fatigue);
    let total = weights.proximity * proximity
        + weights.capacity * capacity
        + weights.efficiency * efficiency
        + weights.fatigue * fatigue;
    BulletScore {
        proximity,
        capacity,
        efficiency,
        fatigue,
        total,
    }
}

/// Tie-break key for BARQ candidates: lexicographic on `(proximity,
/// availability, performance)`, all "higher is better".
pub fn barq_tie_break_key(s: &BarqScore) -> (f64, f64, f64) {
    (s.proximity, s.availability, s.performance)
}

/// Tie-break key for BULLET candidates: lexicographic on `(proximity,
/// capacity, efficiency)`.
pub fn bullet_tie_break_key(s: &BulletScore) -> (f64, f64, f64) {
    (s.proximity, s.capacity, s.efficiency)
}
