//! Driver-to-need scoring, selection, and reposition-action construction
//! (§4.2.4).

use crate::geo::{haversine_km, Point};
use crate::grid::Cell;
use crate::model::{Driver, RepositionAction, RepositionPriority, ServiceType};

/// §4.2.4's additive formula, scaled by the need's priority multiplier.
pub fn score_driver_for_need(
    driver: &Driver,
    target: Point,
    needed_tier: ServiceType,
    priority: RepositionPriority,
) -> f64 {
    let distance_km = haversine_km(driver.location, target);
    let mut score = 100.0 - 2.0 * distance_km;
    if driver.supports(needed_tier) {
        score += match needed_tier {
            ServiceType::Barq => 20.0,
            ServiceType::Bullet => 15.0,
        };
    }
    score += (driver.idle_time_secs as f64 / 60.0).min(20.0);
    score += 5.0 * (driver.rating - 4.0);
    score *= match priority {
        RepositionPriority::Critical => 1.5,
        RepositionPriority::High => 1.2,
        RepositionPriority::Medium | RepositionPriority::Low => 1.0,
    };
    score.max(0.0)
}

/// Picks the top `count` scored drivers, best first.
pub fn select_top<'a>(mut scored: Vec<(&'a Driver, f64)>, count: usize) -> Vec<(&'a Driver, f64)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(count);
    scored
}

pub fn estimated_travel_minutes(distance_km: f64) -> f64 {
    (distance_km * 3.0).ceil()
}

/// Incentive schedule (§4.2.4): `critical=10` base, `high=5`, otherwise `0`,
/// plus a flat `2` travel baseline.
fn base_incentive(priority: RepositionPriority) -> f64 {
    match priority {
        RepositionPriority::Critical => 10.0,
        RepositionPriority::High => 5.0,
        RepositionPriority::Medium | RepositionPriority::Low => 0.0,
    }
}

pub fn build_action(driver: &Driver, target_cell: &Cell, priority: RepositionPriority) -> RepositionAction {
    let distance_km = haversine_km(driver.location, target_cell.center);
    RepositionAction {
        driver_id: driver.id.clone(),
        from: driver.location,
        to: target_cell.center,
        grid_id: target_cell.id.clone(),
        priority,
        estimated_time_minutes: estimated_travel_minutes(distance_km),
        incentive: base_incentive(priority) + 2.0,
        reason: format!("reposition to relieve coverage gap in {}", target_cell.id),
    }
}

/// Fuel cost folded into a cycle's plan cost (§4.2.4/§4.2.6).
pub fn fuel_cost(action: &RepositionAction) -> f64 {
    0.5 * haversine_km(action.from, action.to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capacity, DriverStatus, EstimatedAvailability, FatigueLevel, Performance};

    fn driver() -> Driver {
        Driver {
            id: "d1".into(),
            service_capability: vec![ServiceType::Barq],
            location: Point::new(0.0, 0.0),
            status: DriverStatus::Idle,
            available: true,
            capacity: Capacity { barq: 5, bullet: 0 },
            current_barq_orders: Vec::new(),
            current_bullet_orders: Vec::new(),
            idle_time_secs: 600,
            rating: 4.8,
            fatigue: FatigueLevel::Low,
            performance: Performance::default(),
            estimated_availability: EstimatedAvailability::Immediate,
        }
    }

    #[test]
    fn critical_multiplier_beats_unscaled_score() {
        let d = driver();
        let target = Point::new(0.0, 0.05);
        let base = score_driver_for_need(&d, target, ServiceType::Barq, RepositionPriority::Low);
        let critical = score_driver_for_need(&d, target, ServiceType::Barq, RepositionPriority::Critical);
        assert!(critical > base);
    }

    #[test]
    fn incentive_matches_schedule() {
        assert_eq!(base_incentive(RepositionPriority::Critical) + 2.0, 12.0);
        assert_eq!(base_incentive(RepositionPriority::High) + 2.0, 7.0);
    }
}
