use std::collections::HashMap;

use barq_bullet_dispatch::collaborators::{EtaRequest, EtaResponse, EtaService, FeasibilityRequest, FeasibilityResponse};
use barq_bullet_dispatch::config::EngineConfig;
use barq_bullet_dispatch::dispatch::{AssignmentDeps, OrderAssignmentEngine};
use barq_bullet_dispatch::geo::Point;
use barq_bullet_dispatch::model::{
    Assignment, AssignmentType, Capacity, Driver, DriverStatus, EstimatedAvailability,
    FatigueLevel, FleetSnapshot, Order, OrderStatus, Performance, Priority, ServiceType,
    TimeWindowFeasibility,
};

struct FixedEta;
impl EtaService for FixedEta {
    fn calculate_eta(&self, request: &EtaRequest) -> Option<EtaResponse> {
        Some(EtaResponse { total_minutes: request.distance_km * 2.0, arrival_time: 0 })
    }
    fn check_time_window_feasibility(&self, _request: &FeasibilityRequest) -> FeasibilityResponse {
        FeasibilityResponse { status: TimeWindowFeasibility::OnTime, slack_minutes: 0.0 }
    }
}

fn barq_driver(id: &str, lat: f64, lng: f64) -> Driver {
    Driver {
        id: id.into(),
        service_capability: vec![ServiceType::Barq],
        location: Point::new(lat, lng),
        status: DriverStatus::Available,
        available: true,
        capacity: Capacity { barq: 3, bullet: 0 },
        current_barq_orders: Vec::new(),
        current_bullet_orders: Vec::new(),
        idle_time_secs: 0,
        rating: 0.9,
        fatigue: FatigueLevel::Low,
        performance: Performance::default(),
        estimated_availability: EstimatedAvailability::Immediate,
    }
}

fn barq_order(lat: f64, lng: f64) -> Order {
    Order {
        id: "order-1".into(),
        service_type: ServiceType::Barq,
        pickup: Point::new(lat, lng),
        dropoff: Point::new(lat + 0.02, lng + 0.02),
        time_window: None,
        priority: Priority::High,
        created_at: 0,
        status: OrderStatus::Pending,
    }
}

#[test]
fn scenario_1_barq_immediate_assignment_end_to_end() {
    let engine = OrderAssignmentEngine::new(EngineConfig::default());
    let snapshot = FleetSnapshot::from_drivers(vec![barq_driver("A", 24.701, 46.60)]);
    let order = barq_order(24.70, 46.60);
    let stops = HashMap::new();
    let eta = FixedEta;
    let deps = AssignmentDeps { now_ms: 1_000, eta: &eta, existing_route_stops: &stops };

    let assignment: Assignment = engine.assign(&order, &snapshot, &deps);

    assert_eq!(assignment.assignment_type, AssignmentType::Immediate);
    assert_eq!(assignment.assigned_driver.as_deref(), Some("A"));
    assert!(assignment.estimated_pickup_time > deps.now_ms);
    assert_eq!(engine.recent_assignment_counts().get("A"), Some(&1));
}

#[test]
fn scenario_2_barq_emergency_escalation_end_to_end() {
    let engine = OrderAssignmentEngine::new(EngineConfig::default());
    // ~7km away: outside the 5km standard radius, inside the 10km emergency one.
    let snapshot = FleetSnapshot::from_drivers(vec![barq_driver("C", 24.763, 46.60)]);
    let order = barq_order(24.70, 46.60);
    let stops = HashMap::new();
    let eta = FixedEta;
    let deps = AssignmentDeps { now_ms: 0, eta: &eta, existing_route_stops: &stops };

    let assignment = engine.assign(&order, &snapshot, &deps);

    assert_eq!(assignment.assignment_type, AssignmentType::Emergency);
    assert_eq!(assignment.confidence, 0.6);
    assert!(assignment.warnings.iter().any(|w| w.contains("SLA")));
}

#[test]
fn scenario_3_bullet_batches_onto_an_in_progress_route() {
    let engine = OrderAssignmentEngine::new(EngineConfig::default());
    let driver = Driver {
        id: "D".into(),
        service_capability: vec![ServiceType::Bullet],
        location: Point::new(0.0, 0.0),
        status: DriverStatus::Busy,
        available: false,
        capacity: Capacity { barq: 0, bullet: 3 },
        current_barq_orders: Vec::new(),
        current_bullet_orders: Vec::new(),
        idle_time_secs: 0,
        rating: 0.9,
        fatigue: FatigueLevel::Low,
        performance: Performance::default(),
        estimated_availability: EstimatedAvailability::Immediate,
    };
    let snapshot = FleetSnapshot::from_drivers(vec![driver]);
    let order = Order {
        id: "order-2".into(),
        service_type: ServiceType::Bullet,
        pickup: Point::new(0.0, 0.3),
        dropoff: Point::new(0.0, 0.6),
        time_window: None,
        priority: Priority::Medium,
        created_at: 0,
        status: OrderStatus::Pending,
    };
    let mut stops = HashMap::new();
    stops.insert("D".to_string(), vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]);
    let eta = FixedEta;
    let deps = AssignmentDeps { now_ms: 0, eta: &eta, existing_route_stops: &stops };

    let assignment = engine.assign(&order, &snapshot, &deps);

    assert_eq!(assignment.assignment_type, AssignmentType::Batched);
    assert_eq!(assignment.batch_id.as_deref(), Some("D"));
    assert_eq!(assignment.assigned_driver.as_deref(), Some("D"));
    assert_eq!(assignment.confidence, 0.85);
}

#[test]
fn back_pressure_counts_only_the_last_hour_of_assignments() {
    let engine = OrderAssignmentEngine::new(EngineConfig::default());
    let snapshot = FleetSnapshot::from_drivers(vec![barq_driver("A", 24.70, 46.60)]);
    let order = barq_order(24.70, 46.60);
    let stops = HashMap::new();
    let eta = FixedEta;

    let deps_early = AssignmentDeps { now_ms: 0, eta: &eta, existing_route_stops: &stops };
    engine.assign(&order, &snapshot, &deps_early);

    let deps_late = AssignmentDeps {
        now_ms: 61 * 60 * 1000,
        eta: &eta,
        existing_route_stops: &stops,
    };
    engine.assign(&order, &snapshot, &deps_late);

    assert_eq!(engine.recent_assignment_counts().get("A"), Some(&1));
}
