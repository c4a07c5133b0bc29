//! BARQ tier strategy (§4.1.1): tight-radius immediate search, busy-but-capable
//! fallback, then emergency escalation at double the radius.

use crate::config::EngineConfig;
use crate::errors::ContainedFailure;
use crate::geo::haversine_km;
use crate::model::{Assignment, AssignmentType, Driver, FleetSnapshot, Order, ServiceType};
use crate::scoring::{barq_tie_break_key, score_barq_candidate};

use super::timing;
use super::AssignmentDeps;

const BARQ_RADIUS_KM: f64 = 5.0;
const BARQ_EMERGENCY_RADIUS_KM: f64 = 10.0;
const MAX_BACKUPS: usize = 3;

struct Scored<'a> {
    driver: &'a Driver,
    total: f64,
    tie_break: (f64, f64, f64),
}

fn score_and_rank<'a>(
    candidates: Vec<&'a Driver>,
    order: &Order,
    config: &EngineConfig,
    now_ms: u64,
) -> Vec<Scored<'a>> {
    let mut scored: Vec<Scored<'a>> = candidates
        .into_iter()
        .map(|driver| {
            let distance_km = haversine_km(driver.location, order.pickup);
            let score = score_barq_candidate(driver, distance_km, now_ms, &config.scoring.barq);
            Scored {
                driver,
                total: score.total,
                tie_break: barq_tie_break_key(&score),
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.tie_break.partial_cmp(&a.tie_break).unwrap_or(std::cmp::Ordering::Equal))
    });
    scored
}

fn finalize(
    order: &Order,
    ranked: Vec<Scored<'_>>,
    assignment_type: AssignmentType,
    confidence_override: Option<f64>,
    deps: &AssignmentDeps,
    reasoning: Vec<String>,
    warnings: Vec<String>,
) -> Assignment {
    let winner = &ranked[0];
    let backups: Vec<String> = ranked
        .iter()
        .skip(1)
        .take(MAX_BACKUPS)
        .map(|s| s.driver.id.clone())
        .collect();

    let times = timing::estimate(winner.driver, order, deps.eta, deps.now_ms);
    let mut warnings = warnings;
    if times.used_fallback {
        warnings.push(format!("{}, used fixed-rate fallback", ContainedFailure::EtaUnavailable));
    }

    let confidence = confidence_override.unwrap_or(winner.total);

    Assignment {
        order_id: order.id.clone(),
        assigned_driver: Some(winner.driver.id.clone()),
        assignment_type,
        batch_id: None,
        estimated_pickup_time: times.pickup_time,
        estimated_delivery_time: times.delivery_time,
        confidence,
        score: winner.total,
        backup_drivers: backups,
        time_window_feasibility: times.feasibility,
        reasoning,
        warnings,
    }
}

pub fn assign(
    order: &Order,
    snapshot: &FleetSnapshot,
    config: &EngineConfig,
    deps: &AssignmentDeps,
) -> Assignment {
    // Step 1: available candidates within the standard radius.
    let candidates = snapshot.available_candidates(ServiceType::Barq, order.pickup, BARQ_RADIUS_KM);
    if !candidates.is_empty() {
        let ranked = score_and_rank(candidates, order, config, deps.now_ms);
        return finalize(
            order,
            ranked,
            AssignmentType::Immediate,
            None,
            deps,
            vec!["matched to nearest available BARQ-capable driver".to_string()],
            Vec::new(),
        );
    }

    // Step 2: busy-but-capable, assign to the first eligible driver.
    let busy_capable = snapshot.busy_but_capable(ServiceType::Barq);
    if let Some(driver) = busy_capable.first() {
        let distance_km = haversine_km(driver.location, order.pickup);
        let score = score_barq_candidate(driver, distance_km, deps.now_ms, &config.scoring.barq);
        let ranked = vec![Scored {
            driver,
            total: score.total,
            tie_break: barq_tie_break_key(&score),
        }];
        return finalize(
            order,
            ranked,
            AssignmentType::AddedToRoute,
            None,
            deps,
            vec!["added to the route of a busy but capable driver".to_string()],
            Vec::new(),
        );
    }

    // Step 3: emergency escalation at double the radius.
    let emergency_candidates =
        snapshot.available_candidates(ServiceType::Barq, order.pickup, BARQ_EMERGENCY_RADIUS_KM);
    if !emergency_candidates.is_empty() {
        let ranked = score_and_rank(emergency_candidates, order, config, deps.now_ms);
        return finalize(
            order,
            ranked,
            AssignmentType::Emergency,
            Some(0.6),
            deps,
            vec!["no driver within standard radius, escalated to emergency radius".to_string()],
            vec!["SLA compliance at risk due to driver distance".to_string()],
        );
    }

    let mut queued = Assignment::queued(
        order.id.clone(),
        &format!(
            "{}: no BARQ-capable driver available within emergency radius",
            ContainedFailure::NoCandidates
        ),
    );
    queued.assignment_type = AssignmentType::QueuedPriority;
    queued.warnings.push("SLA will be breached".to_string());
    queued
}
