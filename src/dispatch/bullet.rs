//! BULLET tier strategy (§4.1.1): batching probe first, then a wide-radius
//! candidate search, busy-but-capable fallback, and finally a plain queue.
//!
//! The batching probe takes the *first* driver whose existing route passes
//! Route-Fit rather than the best-scored one — §4.1.1 literally says "and
//! stop" at the first fit, so this isn't a scoring decision at all.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::errors::ContainedFailure;
use crate::geo::{haversine_km, Point};
use crate::model::{Assignment, AssignmentType, Driver, FleetSnapshot, Order, ServiceType};
use crate::routefit::{evaluate_route_fit, MAX_BATCH_DETOUR_KM};
use crate::scoring::{bullet_tie_break_key, score_bullet_candidate};

use super::timing;
use super::AssignmentDeps;

const BULLET_RADIUS_KM: f64 = 20.0;
const MAX_BACKUPS: usize = 3;
/// §4.1.1 step 1: a successful batching probe is always reported at this
/// fixed confidence, not the candidate's computed score.
const BATCHED_CONFIDENCE: f64 = 0.85;

struct Scored<'a> {
    driver: &'a Driver,
    total: f64,
    tie_break: (f64, f64, f64),
}

fn finalize(
    order: &Order,
    driver: &Driver,
    total: f64,
    assignment_type: AssignmentType,
    confidence_override: Option<f64>,
    batch_id: Option<String>,
    backup_drivers: Vec<String>,
    deps: &AssignmentDeps,
    reasoning: Vec<String>,
) -> Assignment {
    let times = timing::estimate(driver, order, deps.eta, deps.now_ms);
    let mut warnings = Vec::new();
    if times.used_fallback {
        warnings.push(format!("{}, used fixed-rate fallback", ContainedFailure::EtaUnavailable));
    }

    Assignment {
        order_id: order.id.clone(),
        assigned_driver: Some(driver.id.clone()),
        assignment_type,
        batch_id,
        estimated_pickup_time: times.pickup_time,
        estimated_delivery_time: times.delivery_time,
        confidence: confidence_override.unwrap_or(total),
        score: total,
        backup_drivers,
        time_window_feasibility: times.feasibility,
        reasoning,
        warnings,
    }
}

/// Looks for the first driver with an existing BULLET route that can absorb
/// this order's pickup/dropoff within the detour budget.
fn try_batch<'a>(
    order: &Order,
    snapshot: &'a FleetSnapshot,
    existing_route_stops: &HashMap<String, Vec<Point>>,
) -> Option<(&'a Driver, f64)> {
    for driver in snapshot.busy_but_capable(ServiceType::Bullet) {
        let Some(stops) = existing_route_stops.get(&driver.id) else {
            continue;
        };
        let fit = evaluate_route_fit(stops, order.pickup, order.dropoff);
        if fit.fits {
            let efficiency = (1.0 - fit.detour_km / MAX_BATCH_DETOUR_KM).clamp(0.0, 1.0);
            return Some((driver, efficiency));
        }
    }
    None
}

pub fn assign(
    order: &Order,
    snapshot: &FleetSnapshot,
    config: &EngineConfig,
    deps: &AssignmentDeps,
) -> Assignment {
    // Step 1: batching probe against drivers already running a BULLET route.
    if let Some((driver, efficiency)) = try_batch(order, snapshot, deps.existing_route_stops) {
        let distance_km = haversine_km(driver.location, order.pickup);
        let score = score_bullet_candidate(driver, distance_km, efficiency, &config.scoring.bullet);
        return finalize(
            order,
            driver,
            score.total,
            AssignmentType::Batched,
            Some(BATCHED_CONFIDENCE),
            Some(driver.id.clone()),
            Vec::new(),
            deps,
            vec!["added to an in-progress driver's route within the batching detour budget".to_string()],
        );
    }

    // Step 2: wide-radius candidate search for a fresh BULLET trip.
    let candidates = snapshot.available_candidates(ServiceType::Bullet, order.pickup, BULLET_RADIUS_KM);
    if !candidates.is_empty() {
        let mut scored: Vec<Scored> = candidates
            .into_iter()
            .map(|driver| {
                let distance_km = haversine_km(driver.location, order.pickup);
                let score = score_bullet_candidate(driver, distance_km, 0.0, &config.scoring.bullet);
                Scored {
                    driver,
                    total: score.total,
                    tie_break: bullet_tie_break_key(&score),
                }
            })
            .collect();
        scored.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.tie_break.partial_cmp(&a.tie_break).unwrap_or(std::cmp::Ordering::Equal))
        });
        let backups = scored
            .iter()
            .skip(1)
            .take(MAX_BACKUPS)
            .map(|s| s.driver.id.clone())
            .collect();
        let winner = &scored[0];
        return finalize(
            order,
            winner.driver,
            winner.total,
            AssignmentType::Immediate,
            None,
            None,
            backups,
            deps,
            vec!["matched to nearest available BULLET-capable driver".to_string()],
        );
    }

    // Step 3: busy-but-capable fallback, first eligible driver.
    if let Some(driver) = snapshot.busy_but_capable(ServiceType::Bullet).first() {
        let distance_km = haversine_km(driver.location, order.pickup);
        let score = score_bullet_candidate(driver, distance_km, 0.0, &config.scoring.bullet);
        return finalize(
            order,
            driver,
            score.total,
            AssignmentType::AddedToRoute,
            None,
            None,
            Vec::new(),
            deps,
            vec!["added to the route of a busy but capable driver".to_string()],
        );
    }

    Assignment::queued(
        order.id.clone(),
        &format!(
            "{}: no BULLET-capable driver available for batching or dispatch",
            ContainedFailure::NoCandidates
        ),
    )
}
