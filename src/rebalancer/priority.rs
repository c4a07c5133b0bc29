//! Need priority scoring and overall cycle strategy selection (§4.2.3).

use crate::geo::Point;
use crate::grid::{Cell, Grid};
use crate::model::RepositionPriority;

const BARQ_ZERO_DEMAND_THRESHOLD: f64 = 0.3;
const BULLET_ZERO_DEMAND_THRESHOLD: f64 = 0.2;
const PENDING_ORDERS_WEIGHT: f64 = 0.1;
const PENDING_ORDERS_CAP: f64 = 0.3;
const HOTSPOT_BONUS: f64 = 0.2;

/// `p ∈ [0,1]` per §4.2.3's additive formula.
pub fn score(cell: &Cell, has_hotspot: bool) -> f64 {
    let mut p = 0.0;
    if cell.barq_driver_count == 0 && cell.historical_demand.barq > BARQ_ZERO_DEMAND_THRESHOLD {
        p += 0.4;
    }
    if cell.bullet_driver_count == 0 && cell.historical_demand.bullet > BULLET_ZERO_DEMAND_THRESHOLD {
        p += 0.3;
    }
    p += (PENDING_ORDERS_WEIGHT * cell.pending_orders as f64).min(PENDING_ORDERS_CAP);
    if has_hotspot {
        p += HOTSPOT_BONUS;
    }
    p.min(1.0)
}

/// `critical (p>0.8) · high (>0.6) · medium (>0.4) · low`.
pub fn bucket(p: f64) -> RepositionPriority {
    if p > 0.8 {
        RepositionPriority::Critical
    } else if p > 0.6 {
        RepositionPriority::High
    } else if p > 0.4 {
        RepositionPriority::Medium
    } else {
        RepositionPriority::Low
    }
}

pub fn cell_contains_hotspot(grid: &Grid, cell: &Cell, hotspots: &[Point]) -> bool {
    hotspots.iter().any(|p| grid.locate(*p) == Some((cell.row, cell.col)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceStrategy {
    Emergency,
    Predictive,
    Proactive,
    Reactive,
}

/// §4.2.3's overall strategy selection, evaluated in priority order.
pub fn select_strategy(critical_count: usize, high_count: usize, expected_spike: bool) -> RebalanceStrategy {
    if critical_count > 0 {
        RebalanceStrategy::Emergency
    } else if expected_spike {
        RebalanceStrategy::Predictive
    } else if high_count > 3 {
        RebalanceStrategy::Proactive
    } else {
        RebalanceStrategy::Reactive
    }
}
