//! Time estimation (§4.1.4): ETA-collaborator-backed travel times with the
//! fixed-rate fallback (`distanceKm * 3` minutes, 5-minute pickup service)
//! when the ETA service is unavailable.

use crate::collaborators::{EtaRequest, EtaService, FeasibilityRequest};
use crate::geo::haversine_km;
use crate::model::{Driver, Order, TimeWindowFeasibility, TimestampMs};

#[derive(Debug, Clone, Copy)]
pub struct EstimatedTimes {
    pub pickup_time: TimestampMs,
    pub delivery_time: TimestampMs,
    pub feasibility: Option<TimeWindowFeasibility>,
    pub used_fallback: bool,
}

fn fallback_travel_minutes(distance_km: f64) -> f64 {
    (distance_km * 3.0).ceil()
}

fn leg_minutes(eta: &dyn EtaService, order: &Order, distance_km: f64) -> (f64, bool) {
    let request = EtaRequest {
        distance_km,
        vehicle_type: order.service_type,
        traffic_condition: None,
        weather_condition: None,
        driver_history: None,
        num_stops: 1,
        total_route_distance_km: distance_km,
    };
    match eta.calculate_eta(&request) {
        Some(response) => (response.total_minutes, false),
        None => (fallback_travel_minutes(distance_km), true),
    }
}

pub fn estimate(driver: &Driver, order: &Order, eta: &dyn EtaService, now_ms: TimestampMs) -> EstimatedTimes {
    let pickup_distance_km = haversine_km(driver.location, order.pickup);
    let trip_distance_km = haversine_km(order.pickup, order.dropoff);

    let (pickup_minutes, pickup_fallback) = leg_minutes(eta, order, pickup_distance_km);
    let (trip_minutes, trip_fallback) = leg_minutes(eta, order, trip_distance_km);
    let pickup_service_minutes = eta.pickup_service_minutes();

    let total_minutes = pickup_minutes + pickup_service_minutes + trip_minutes;
    let pickup_time = now_ms + (pickup_minutes * 60_000.0).round() as u64;
    let delivery_time = now_ms + (total_minutes * 60_000.0).round() as u64;

    let feasibility = order.time_window.map(|window| {
        eta.check_time_window_feasibility(&FeasibilityRequest {
            current_time: now_ms,
            time_window: window,
            travel_minutes: total_minutes,
        })
        .status
    });

    EstimatedTimes {
        pickup_time,
        delivery_time,
        feasibility,
        used_fallback: pickup_fallback || trip_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{EtaResponse, FeasibilityResponse};
    use crate::geo::Point;
    use crate::model::{
        Capacity, DriverStatus, EstimatedAvailability, FatigueLevel, Performance, ServiceType,
        TimeWindow,
    };

    struct NoEta;
    impl EtaService for NoEta {
        fn calculate_eta(&self, _request: &EtaRequest) -> Option<EtaResponse> {
            None
        }
        fn check_time_window_feasibility(
            &self,
            _request: &FeasibilityRequest,
        ) -> FeasibilityResponse {
            FeasibilityResponse {
                status: TimeWindowFeasibility::OnTime,
                slack_minutes: 0.0,
            }
        }
    }

    fn test_driver() -> Driver {
        Driver {
            id: "d1".into(),
            service_capability: vec![ServiceType::Barq, ServiceType::Bullet],
            location: Point::new(0.0, 0.0),
            status: DriverStatus::Available,
            available: true,
            capacity: Capacity { barq: 5, bullet: 10 },
            current_barq_orders: Vec::new(),
            current_bullet_orders: Vec::new(),
            idle_time_secs: 0,
            rating: 5.0,
            fatigue: FatigueLevel::Low,
            performance: Performance::default(),
            estimated_availability: EstimatedAvailability::Immediate,
        }
    }

    fn test_order(time_window: Option<TimeWindow>) -> Order {
        Order {
            id: "o1".into(),
            service_type: ServiceType::Barq,
            pickup: Point::new(0.0, 0.01),
            dropoff: Point::new(0.0, 0.02),
            time_window,
            priority: crate::model::Priority::Medium,
            created_at: 0,
            status: crate::model::OrderStatus::Pending,
        }
    }

    #[test]
    fn falls_back_when_eta_unavailable() {
        let driver = test_driver();
        let order = test_order(None);
        let estimate = estimate(&driver, &order, &NoEta, 0);
        assert!(estimate.used_fallback);
        assert!(estimate.pickup_time > 0);
        assert!(estimate.delivery_time > estimate.pickup_time);
    }

    #[test]
    fn annotates_feasibility_when_time_window_present() {
        let driver = test_driver();
        let order = test_order(Some(TimeWindow {
            earliest: 0,
            latest: 10_000_000,
        }));
        let estimate = estimate(&driver, &order, &NoEta, 0);
        assert_eq!(estimate.feasibility, Some(TimeWindowFeasibility::OnTime));
    }
}
