//! Order assignment (§4.1): the `OrderAssignmentEngine` orchestrates the
//! per-tier strategies in [`barq`] and [`bullet`], and keeps the short sliding
//! window of recent assignments §4.1.5 uses for back-pressure bookkeeping.

mod barq;
mod bullet;
mod timing;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::collaborators::EtaService;
use crate::config::EngineConfig;
use crate::geo::Point;
use crate::model::{Assignment, FleetSnapshot, Order, ServiceType, TimestampMs};

const RECENT_ASSIGNMENT_WINDOW_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Copy)]
struct RecentAssignmentRecord {
    at_ms: TimestampMs,
}

/// Everything `assign()` needs that isn't owned by the engine itself:
/// the current clock, the ETA collaborator, and each busy driver's existing
/// ordered stop list (for the BULLET batching probe).
pub struct AssignmentDeps<'a> {
    pub now_ms: TimestampMs,
    pub eta: &'a dyn EtaService,
    pub existing_route_stops: &'a HashMap<String, Vec<Point>>,
}

/// Stateless across calls except for the recent-assignment bookkeeping
/// (§4.1.5): everything else is recomputed fresh from the fleet snapshot
/// handed to `assign()`.
pub struct OrderAssignmentEngine {
    config: EngineConfig,
    recent_assignments: Mutex<HashMap<String, Vec<RecentAssignmentRecord>>>,
}

impl OrderAssignmentEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            recent_assignments: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn assign(&self, order: &Order, snapshot: &FleetSnapshot, deps: &AssignmentDeps) -> Assignment {
        let assignment = match order.service_type {
            ServiceType::Barq => barq::assign(order, snapshot, &self.config, deps),
            ServiceType::Bullet => bullet::assign(order, snapshot, &self.config, deps),
        };

        if let Some(driver_id) = &assignment.assigned_driver {
            self.record_assignment(driver_id.clone(), deps.now_ms);
        }

        assignment
    }

    fn record_assignment(&self, driver_id: String, at_ms: TimestampMs) {
        let mut recent = self.recent_assignments.lock().expect("recent_assignments mutex poisoned");
        let cutoff = at_ms.saturating_sub(RECENT_ASSIGNMENT_WINDOW_MS);
        for records in recent.values_mut() {
            records.retain(|r| r.at_ms >= cutoff);
        }
        recent.retain(|_, records| !records.is_empty());
        recent.entry(driver_id).or_default().push(RecentAssignmentRecord { at_ms });
    }

    /// Count of assignments each driver has received within the last hour,
    /// exposed read-only for introspection/back-pressure checks.
    pub fn recent_assignment_counts(&self) -> HashMap<String, usize> {
        let recent = self.recent_assignments.lock().expect("recent_assignments mutex poisoned");
        recent.iter().map(|(id, records)| (id.clone(), records.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{EtaRequest, EtaResponse, FeasibilityRequest, FeasibilityResponse};
    use crate::model::{
        Capacity, Driver, DriverStatus, EstimatedAvailability, FatigueLevel, OrderStatus, Performance,
        Priority, TimeWindowFeasibility,
    };

    struct StubEta;
    impl EtaService for StubEta {
        fn calculate_eta(&self, request: &EtaRequest) -> Option<EtaResponse> {
            Some(EtaResponse { total_minutes: request.distance_km * 2.0, arrival_time: 0 })
        }
        fn check_time_window_feasibility(&self, _request: &FeasibilityRequest) -> FeasibilityResponse {
            FeasibilityResponse { status: TimeWindowFeasibility::OnTime, slack_minutes: 0.0 }
        }
    }

    fn test_driver() -> Driver {
        Driver {
            id: "d1".into(),
            service_capability: vec![ServiceType::Barq, ServiceType::Bullet],
            location: Point::new(24.70, 46.60),
            status: DriverStatus::Available,
            available: true,
            capacity: Capacity { barq: 5, bullet: 10 },
            current_barq_orders: Vec::new(),
            current_bullet_orders: Vec::new(),
            idle_time_secs: 0,
            rating: 0.9,
            fatigue: FatigueLevel::Low,
            performance: Performance::default(),
            estimated_availability: EstimatedAvailability::Immediate,
        }
    }

    fn test_order() -> Order {
        Order {
            id: "o1".into(),
            service_type: ServiceType::Barq,
            pickup: Point::new(24.70, 46.60),
            dropoff: Point::new(24.71, 46.61),
            time_window: None,
            priority: Priority::Medium,
            created_at: 0,
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn assign_dispatches_by_service_type_and_records_bookkeeping() {
        let engine = OrderAssignmentEngine::new(EngineConfig::default());
        let snapshot = FleetSnapshot::from_drivers(vec![test_driver()]);
        let order = test_order();
        let stops = HashMap::new();
        let eta = StubEta;
        let deps = AssignmentDeps { now_ms: 1_000, eta: &eta, existing_route_stops: &stops };

        let assignment = engine.assign(&order, &snapshot, &deps);
        assert_eq!(assignment.assigned_driver.as_deref(), Some("d1"));

        let counts = engine.recent_assignment_counts();
        assert_eq!(counts.get("d1"), Some(&1));
    }

    #[test]
    fn old_assignments_age_out_of_the_window() {
        let engine = OrderAssignmentEngine::new(EngineConfig::default());
        engine.record_assignment("d1".to_string(), 0);
        engine.record_assignment("d1".to_string(), RECENT_ASSIGNMENT_WINDOW_MS + 1);
        let counts = engine.recent_assignment_counts();
        assert_eq!(counts.get("d1"), Some(&1));
    }
}
