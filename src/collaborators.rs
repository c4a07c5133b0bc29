//! External interfaces (§6): everything the engine treats as an opaque
//! collaborator instead of implementing itself — fleet status, driver
//! dispatch, ETA, and demand forecasting. Each is a `Send + Sync` trait
//! object, the same shape the reference crate uses for its pluggable
//! [`crate routing::RouteProvider`]-style backends, so a host can swap in a
//! real HTTP-backed implementation without the engine knowing the difference.

use crate::model::{FleetSnapshot, RepositionAction, TimeWindow};

use serde::{Deserialize, Serialize};

/// `getFleetStatus()` — the only source of truth the engine reads drivers
/// from. The engine never mutates what this returns.
pub trait FleetStatusProvider: Send + Sync {
    fn get_fleet_status(&self) -> FleetSnapshot;
}

/// `sendRepositionRequest(action) -> {accepted, reason?}`. Implementations
/// must be idempotent on `(driverId, gridId)`.
pub trait DriverDispatchCollaborator: Send + Sync {
    fn send_reposition_request(&self, action: &RepositionAction) -> DispatchResponse;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub accepted: bool,
    pub reason: Option<String>,
}

/// Travel-time estimation and time-window feasibility checks.
pub trait EtaService: Send + Sync {
    fn calculate_eta(&self, request: &EtaRequest) -> Option<EtaResponse>;

    fn check_time_window_feasibility(
        &self,
        request: &FeasibilityRequest,
    ) -> FeasibilityResponse;

    /// `stopTimes.pickup`, minutes. Default matches spec §6's documented
    /// default of 5 minutes.
    fn pickup_service_minutes(&self) -> f64 {
        5.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaRequest {
    pub distance_km: f64,
    pub vehicle_type: crate::model::ServiceType,
    pub traffic_condition: Option<String>,
    pub weather_condition: Option<String>,
    pub driver_history: Option<f64>,
    pub num_stops: usize,
    pub total_route_distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtaResponse {
    pub total_minutes: f64,
    pub arrival_time: crate::model::TimestampMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRequest {
    pub current_time: crate::model::TimestampMs,
    pub time_window: TimeWindow,
    pub travel_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResponse {
    pub status: crate::model::TimeWindowFeasibility,
    pub slack_minutes: f64,
}

/// Optional demand-forecasting collaborator (§6). Absent by default — the
/// rebalancer falls back to `REACTIVE`/`PROACTIVE` strategy selection when
/// no forecaster is wired in.
pub trait DemandForecaster: Send + Sync {
    fn forecast(&self) -> ForecastReport;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub expected_spike: bool,
    pub hotspots: Vec<crate::geo::Point>,
}
