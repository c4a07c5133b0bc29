//! Route Enhancement (§4.3): restricted-area filtering over a stop list,
//! an external-router call on the serviceable subsequence, and a fixed
//! fallback when the router is unavailable.

pub mod osrm;
pub mod polygon;

use serde_json::Value;

use crate::errors::{ContainedFailure, EngineError};
use crate::geo::{haversine_km, Point};
use crate::model::RestrictedArea;

use osrm::{AlternativeRoute, OsrmError, Router};

/// Classifies a router failure into the containment-policy bucket it
/// reports under (§7): everything here is non-fatal, folded into
/// `EnhancedRoute::osrm_error` instead of propagated as `Err`.
fn classify(err: &OsrmError) -> ContainedFailure {
    match err {
        OsrmError::Http(e) if e.is_timeout() => ContainedFailure::RouterTimeout,
        OsrmError::Http(_) => ContainedFailure::RouterFailure,
        OsrmError::Json(_) => ContainedFailure::RouterBadPayload,
        OsrmError::Api(_) | OsrmError::NoRoute => ContainedFailure::RouterFailure,
    }
}

/// Fallback values when the router can't be reached (§8 scenario 6).
pub const FALLBACK_DISTANCE_KM: f64 = 5.0;
pub const FALLBACK_DURATION_MINUTES: f64 = 30.0;

/// §4.3 step 4: consecutive waypoints closer than this produce a warning,
/// not an abort.
pub const CLOSE_WAYPOINT_THRESHOLD_KM: f64 = 0.025;

/// §4.3 step 5's `efficiency`/`serviceQuality` are spelled out as literal
/// constants in the spec, not derived scores — mirrors BULLET's fixed
/// batching confidence (§4.1.1).
pub const METRICS_EFFICIENCY: f64 = 0.85;
pub const METRICS_SERVICE_QUALITY: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopOutcome {
    pub point: Point,
    pub unserviceable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    pub efficiency: f64,
    pub utilization: f64,
    pub service_quality: f64,
    pub stop_density: f64,
}

impl RouteMetrics {
    fn compute(stop_count: usize, distance_km: f64, load: f64, capacity: f64) -> Self {
        let utilization = if capacity > 0.0 { (load / capacity).min(1.0) } else { 0.0 };
        let stop_density = if distance_km > 0.0 { stop_count as f64 / distance_km } else { 0.0 };
        Self {
            efficiency: METRICS_EFFICIENCY,
            utilization,
            service_quality: METRICS_SERVICE_QUALITY,
            stop_density,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedRoute {
    pub stops: Vec<StopOutcome>,
    pub unserviceable_stops: Vec<Point>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub geometry: Option<String>,
    pub alternatives: Vec<AlternativeRoute>,
    pub metrics: Option<RouteMetrics>,
    pub osrm_error: Option<String>,
    pub warnings: Vec<String>,
}

/// §4.3 step 4: flags any consecutive pair of the ordered serviceable
/// waypoints closer together than [`CLOSE_WAYPOINT_THRESHOLD_KM`].
fn close_waypoint_warnings(stops: &[Point]) -> Vec<String> {
    stops
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let distance_km = haversine_km(pair[0], pair[1]);
            (distance_km < CLOSE_WAYPOINT_THRESHOLD_KM).then(|| {
                format!("waypoints {i} and {} are closer than 25 m apart ({:.1} m)", i + 1, distance_km * 1000.0)
            })
        })
        .collect()
}

/// Unifies the three wire encodings Route Enhancement accepts for a stop
/// coordinate into a single [`Point`] (§9): `{lat,lng}`, `{latitude,longitude}`,
/// or a two-element `[lng, lat]` array (GeoJSON order).
pub fn parse_stop(value: &Value) -> Result<Point, EngineError> {
    if let Some(obj) = value.as_object() {
        if let (Some(lat), Some(lng)) = (obj.get("lat").and_then(Value::as_f64), obj.get("lng").and_then(Value::as_f64)) {
            return Ok(Point::new(lat, lng));
        }
        if let (Some(lat), Some(lng)) =
            (obj.get("latitude").and_then(Value::as_f64), obj.get("longitude").and_then(Value::as_f64))
        {
            return Ok(Point::new(lat, lng));
        }
    }
    if let Some(arr) = value.as_array() {
        if let [lng, lat] = arr.as_slice() {
            if let (Some(lng), Some(lat)) = (lng.as_f64(), lat.as_f64()) {
                return Ok(Point::new(lat, lng));
            }
        }
    }
    Err(EngineError::InvalidGeometry(format!(
        "unrecognised stop coordinate encoding: {value}"
    )))
}

fn is_restricted(point: Point, restricted_areas: &[RestrictedArea]) -> bool {
    restricted_areas.iter().any(|area| polygon::point_in_polygon(point, &area.polygon))
}

/// Filters `stops` against `restricted_areas`, calls `router` over the
/// serviceable subsequence, and falls back to fixed values on any router
/// failure (timeout, bad payload, non-`Ok` code) without aborting the call.
///
/// `load`/`capacity` are the dispatching vehicle's current load and tier
/// capacity, fed straight into the `utilization` metric (§4.3 step 5) —
/// this function otherwise has no opinion on their source.
pub fn enhance(
    stops: &[Point],
    restricted_areas: &[RestrictedArea],
    router: &dyn Router,
    load: f64,
    capacity: f64,
) -> Result<EnhancedRoute, EngineError> {
    if stops.len() < 2 {
        return Err(EngineError::InvalidGeometry(format!(
            "route enhancement needs at least 2 usable stops, got {}",
            stops.len()
        )));
    }

    let outcomes: Vec<StopOutcome> = stops
        .iter()
        .map(|&point| StopOutcome {
            point,
            unserviceable: is_restricted(point, restricted_areas),
        })
        .collect();

    let unserviceable_stops: Vec<Point> = outcomes.iter().filter(|o| o.unserviceable).map(|o| o.point).collect();
    let serviceable: Vec<Point> = outcomes.iter().filter(|o| !o.unserviceable).map(|o| o.point).collect();

    if serviceable.len() < 2 {
        return Ok(fallback_route(
            outcomes,
            unserviceable_stops,
            Vec::new(),
            "fewer than 2 serviceable stops after restricted-area filtering".to_string(),
        ));
    }

    let warnings = close_waypoint_warnings(&serviceable);

    match router.route(&serviceable) {
        Ok(route) => {
            let metrics = RouteMetrics::compute(serviceable.len(), route.distance_km, load, capacity);
            Ok(EnhancedRoute {
                stops: outcomes,
                unserviceable_stops,
                distance_km: route.distance_km,
                duration_minutes: route.duration_minutes,
                geometry: Some(route.geometry),
                alternatives: route.alternatives,
                metrics: Some(metrics),
                osrm_error: None,
                warnings,
            })
        }
        Err(err) => Ok(fallback_route(
            outcomes,
            unserviceable_stops,
            warnings,
            format!("{}: {err}", classify(&err)),
        )),
    }
}

fn fallback_route(
    stops: Vec<StopOutcome>,
    unserviceable_stops: Vec<Point>,
    warnings: Vec<String>,
    osrm_error: String,
) -> EnhancedRoute {
    EnhancedRoute {
        stops,
        unserviceable_stops,
        distance_km: FALLBACK_DISTANCE_KM,
        duration_minutes: FALLBACK_DURATION_MINUTES,
        geometry: None,
        alternatives: Vec::new(),
        metrics: None,
        osrm_error: Some(osrm_error),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StubRouter(Result<osrm::OsrmRoute, ()>);
    impl Router for StubRouter {
        fn route(&self, _stops: &[Point]) -> Result<osrm::OsrmRoute, OsrmError> {
            self.0.clone().map_err(|_| OsrmError::NoRoute)
        }
    }

    #[test]
    fn parse_stop_accepts_all_three_encodings() {
        assert_eq!(parse_stop(&json!({"lat": 1.0, "lng": 2.0})).unwrap(), Point::new(1.0, 2.0));
        assert_eq!(parse_stop(&json!({"latitude": 1.0, "longitude": 2.0})).unwrap(), Point::new(1.0, 2.0));
        assert_eq!(parse_stop(&json!([2.0, 1.0])).unwrap(), Point::new(1.0, 2.0));
    }

    #[test]
    fn parse_stop_rejects_unrecognised_shapes() {
        assert!(parse_stop(&json!("nowhere")).is_err());
    }

    #[test]
    fn scenario_5_restricted_stop_is_excluded_before_the_router_call() {
        let stops = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let polygon = vec![
            Point::new(0.5, 0.5),
            Point::new(0.5, 1.5),
            Point::new(1.5, 1.5),
            Point::new(1.5, 0.5),
        ];
        let areas = vec![RestrictedArea::new("test-zone", polygon).unwrap()];
        let router = StubRouter(Ok(osrm::OsrmRoute {
            distance_km: 10.0,
            duration_minutes: 20.0,
            geometry: "abc".to_string(),
            alternatives: Vec::new(),
        }));

        let enhanced = enhance(&stops, &areas, &router, 2.0, 5.0).unwrap();
        assert_eq!(enhanced.unserviceable_stops, vec![Point::new(1.0, 1.0)]);
        assert!(enhanced.osrm_error.is_none());
        let metrics = enhanced.metrics.unwrap();
        assert_eq!(metrics.efficiency, METRICS_EFFICIENCY);
        assert_eq!(metrics.service_quality, METRICS_SERVICE_QUALITY);
        assert_eq!(metrics.utilization, 0.4);
        assert_eq!(metrics.stop_density, 2.0 / 10.0);
    }

    #[test]
    fn scenario_6_router_failure_falls_back_without_failing_the_call() {
        let stops = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let router = StubRouter(Err(()));
        let enhanced = enhance(&stops, &[], &router, 0.0, 5.0).unwrap();
        assert_eq!(enhanced.distance_km, FALLBACK_DISTANCE_KM);
        assert_eq!(enhanced.duration_minutes, FALLBACK_DURATION_MINUTES);
        assert!(enhanced.osrm_error.is_some());
        assert!(enhanced.metrics.is_none());
    }

    #[test]
    fn fewer_than_two_usable_stops_is_an_error() {
        let stops = vec![Point::new(0.0, 0.0)];
        let router = StubRouter(Err(()));
        assert!(enhance(&stops, &[], &router, 0.0, 5.0).is_err());
    }

    #[test]
    fn utilization_is_zero_when_capacity_is_zero() {
        let metrics = RouteMetrics::compute(3, 10.0, 2.0, 0.0);
        assert_eq!(metrics.utilization, 0.0);
    }

    #[test]
    fn close_waypoints_under_25m_produce_a_warning_without_failing() {
        let stops = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0001), Point::new(1.0, 1.0)];
        let router = StubRouter(Ok(osrm::OsrmRoute {
            distance_km: 5.0,
            duration_minutes: 10.0,
            geometry: "xyz".to_string(),
            alternatives: Vec::new(),
        }));
        let enhanced = enhance(&stops, &[], &router, 0.0, 5.0).unwrap();
        assert_eq!(enhanced.warnings.len(), 1);
        assert!(enhanced.warnings[0].contains("25 m"));
    }
}
