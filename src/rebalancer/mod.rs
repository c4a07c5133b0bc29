//! Fleet rebalancer (§4.2): coverage analysis, need prioritisation, and
//! idle-driver repositioning, run on a periodic trigger or on demand.
//!
//! Owns the grid exclusively — `assign()` never writes it (§5) — and
//! serialises cycles with an in-flight flag rather than the source's
//! unguarded overlapping-cycle behaviour (§9).

pub mod coverage;
pub mod priority;
pub mod selection;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::collaborators::{DemandForecaster, DriverDispatchCollaborator, ForecastReport};
use crate::config::EngineConfig;
use crate::grid::Grid;
use crate::model::{FleetSnapshot, RepositionAction, RepositionPriority, ServiceType, TimestampMs};

use coverage::{CellClassification, CoverageMetrics};
use priority::RebalanceStrategy;

struct Need {
    row: usize,
    col: usize,
    tier: ServiceType,
    required: usize,
    priority: RepositionPriority,
}

#[derive(Debug, Clone)]
pub struct ActiveReposition {
    pub action: RepositionAction,
    pub started_at: TimestampMs,
}

#[derive(Debug, Clone)]
pub struct CycleHistoryRecord {
    pub at_ms: TimestampMs,
    pub actions: Vec<RepositionAction>,
    pub successful: Vec<String>,
    pub failed: Vec<String>,
    pub declined: Vec<String>,
    pub success_rate: f64,
}

#[derive(Debug, Clone)]
pub struct RebalanceCycleResult {
    pub strategy: RebalanceStrategy,
    pub actions: Vec<RepositionAction>,
    pub successful: Vec<String>,
    pub failed: Vec<String>,
    pub declined: Vec<String>,
    pub coverage: CoverageMetrics,
    pub distinct_cells_improved: usize,
    pub critical_needs_resolved: usize,
    pub coverage_increase: f64,
    pub sla_improvement: f64,
    pub estimated_time_minutes: f64,
    pub cost: f64,
}

pub struct FleetRebalancer {
    config: EngineConfig,
    grid: Mutex<Grid>,
    active_repositioning: Mutex<HashMap<String, ActiveReposition>>,
    cycle_in_flight: AtomicBool,
    history: Mutex<Vec<CycleHistoryRecord>>,
}

impl FleetRebalancer {
    pub fn new(config: EngineConfig) -> Self {
        let grid = Grid::new(&config.grid);
        Self {
            config,
            grid: Mutex::new(grid),
            active_repositioning: Mutex::new(HashMap::new()),
            cycle_in_flight: AtomicBool::new(false),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<CycleHistoryRecord> {
        self.history.lock().expect("history mutex poisoned").clone()
    }

    pub fn active_repositioning_count(&self) -> usize {
        self.active_repositioning
            .lock()
            .expect("active_repositioning mutex poisoned")
            .len()
    }

    /// Clears a driver's active-repositioning entry once its trip to the
    /// target cell completes. Not part of §4.2's cycle logic itself, but
    /// required for the `not in activeRepositioning` eligibility check to
    /// ever free up again.
    pub fn complete_repositioning(&self, driver_id: &str) {
        self.active_repositioning
            .lock()
            .expect("active_repositioning mutex poisoned")
            .remove(driver_id);
    }

    /// Centre point of a grid cell, for hosts that need to place synthetic
    /// demand or test fixtures relative to the rebalancer's own cell layout.
    pub fn cell_center(&self, row: usize, col: usize) -> Option<crate::geo::Point> {
        self.grid.lock().expect("grid mutex poisoned").cell_at(row, col).map(|c| c.center)
    }

    /// Feeds `historicalDemand`/`pendingOrders` (§3) into a cell. The engine
    /// has no opinion on where these numbers come from — a host wires its own
    /// order-queue and demand-history tracking into this before calling
    /// `run_cycle`.
    pub fn set_cell_demand(
        &self,
        row: usize,
        col: usize,
        demand: crate::grid::HistoricalDemand,
        pending_orders: usize,
    ) {
        let mut grid = self.grid.lock().expect("grid mutex poisoned");
        if let Some(cell) = grid.cell_at_mut(row, col) {
            cell.historical_demand = demand;
            cell.pending_orders = pending_orders;
        }
    }

    /// Runs one rebalance cycle. Returns `None` if a cycle is already in
    /// flight — the trigger is coalesced, not queued (§5).
    pub fn run_cycle(
        &self,
        snapshot: &FleetSnapshot,
        forecaster: Option<&dyn DemandForecaster>,
        dispatcher: &dyn DriverDispatchCollaborator,
        now_ms: TimestampMs,
    ) -> Option<RebalanceCycleResult> {
        if self
            .cycle_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let result = self.run_cycle_inner(snapshot, forecaster, dispatcher, now_ms);
        self.cycle_in_flight.store(false, Ordering::SeqCst);
        Some(result)
    }

    fn run_cycle_inner(
        &self,
        snapshot: &FleetSnapshot,
        forecaster: Option<&dyn DemandForecaster>,
        dispatcher: &dyn DriverDispatchCollaborator,
        now_ms: TimestampMs,
    ) -> RebalanceCycleResult {
        let mut grid = self.grid.lock().expect("grid mutex poisoned");

        // §4.2.1: grid update.
        grid.clear_driver_assignments();
        for driver in snapshot.all() {
            if let Some((row, col)) = grid.locate(driver.location) {
                let cell = grid.cell_at_mut(row, col).expect("locate returned an in-bounds cell");
                cell.drivers.push(driver.id.clone());
                if driver.supports(ServiceType::Barq) {
                    cell.barq_driver_count += 1;
                }
                if driver.supports(ServiceType::Bullet) {
                    cell.bullet_driver_count += 1;
                }
            }
        }

        let coverage_metrics = coverage::citywide_metrics(&grid);
        let report = forecaster
            .map(|f| f.forecast())
            .unwrap_or(ForecastReport { expected_spike: false, hotspots: Vec::new() });

        // §4.2.2/§4.2.3: classify cells and build the prioritised need list.
        let mut needs = Vec::new();
        let mut critical_count = 0usize;
        let mut high_count = 0usize;

        for cell in grid.cells() {
            let classification = coverage::classify(
                cell.barq_driver_count,
                cell.bullet_driver_count,
                cell.historical_demand.barq,
                cell.historical_demand.bullet,
                &self.config.coverage,
            );
            if classification != CellClassification::Underserved {
                continue;
            }
            let has_hotspot = priority::cell_contains_hotspot(&grid, cell, &report.hotspots);
            let p = priority::score(cell, has_hotspot);
            let bucket = priority::bucket(p);
            match bucket {
                RepositionPriority::Critical => critical_count += 1,
                RepositionPriority::High => high_count += 1,
                _ => continue, // medium/low cells aren't dispatched this cycle.
            }

            let required_barq = self.config.coverage.min_barq_per_cell.saturating_sub(cell.barq_driver_count);
            let required_bullet = self.config.coverage.min_bullet_per_cell.saturating_sub(cell.bullet_driver_count);
            if required_barq > 0 {
                needs.push(Need { row: cell.row, col: cell.col, tier: ServiceType::Barq, required: required_barq, priority: bucket });
            }
            if required_bullet > 0 {
                needs.push(Need { row: cell.row, col: cell.col, tier: ServiceType::Bullet, required: required_bullet, priority: bucket });
            }
        }

        let strategy = priority::select_strategy(critical_count, high_count, report.expected_spike);

        // Process critical needs first, then high — skipping high entirely
        // under EMERGENCY (§4.2.4).
        needs.sort_by_key(|n| match n.priority {
            RepositionPriority::Critical => 0,
            _ => 1,
        });

        let already_active: HashSet<String> = self
            .active_repositioning
            .lock()
            .expect("active_repositioning mutex poisoned")
            .keys()
            .cloned()
            .collect();

        let eligible = snapshot.idle_eligible_for_reposition(
            self.config.triggers.reposition_eligibility_idle_secs,
            &already_active,
        );
        let pool: Vec<&crate::model::Driver> = eligible;
        let mut used: HashSet<String> = HashSet::new();

        let mut actions = Vec::new();
        let mut successful = Vec::new();
        let mut failed = Vec::new();
        let mut declined = Vec::new();
        let mut critical_resolved_cells: HashSet<(usize, usize)> = HashSet::new();
        let mut improved_cells: HashSet<(usize, usize)> = HashSet::new();

        for need in &needs {
            if strategy == RebalanceStrategy::Emergency && need.priority != RepositionPriority::Critical {
                continue;
            }
            let target_cell = grid.cell_at(need.row, need.col).expect("need row/col came from this grid");

            let scored: Vec<(&crate::model::Driver, f64)> = pool
                .iter()
                .filter(|d| !used.contains(&d.id))
                .map(|d| (*d, selection::score_driver_for_need(d, target_cell.center, need.tier, need.priority)))
                .collect();
            let picked = selection::select_top(scored, need.required);

            let mut need_satisfied = false;
            for (driver, _score) in picked {
                used.insert(driver.id.clone());
                let action = selection::build_action(driver, target_cell, need.priority);

                let response = dispatcher.send_reposition_request(&action);
                if response.accepted {
                    self.active_repositioning.lock().expect("active_repositioning mutex poisoned").insert(
                        driver.id.clone(),
                        ActiveReposition { action: action.clone(), started_at: now_ms },
                    );
                    successful.push(driver.id.clone());
                    improved_cells.insert((need.row, need.col));
                    need_satisfied = true;
                } else {
                    declined.push(driver.id.clone());
                }
                actions.push(action);
            }

            if need.priority == RepositionPriority::Critical && need_satisfied {
                critical_resolved_cells.insert((need.row, need.col));
            }
        }

        let estimated_time_minutes = actions
            .iter()
            .map(|a| a.estimated_time_minutes)
            .fold(0.0_f64, f64::max);
        let cost: f64 = actions.iter().map(|a| a.incentive + selection::fuel_cost(a)).sum();

        let total_dispatched = (successful.len() + failed.len() + declined.len()).max(1) as f64;
        let success_rate = successful.len() as f64 / total_dispatched;

        self.history.lock().expect("history mutex poisoned").push(CycleHistoryRecord {
            at_ms: now_ms,
            actions: actions.clone(),
            successful: successful.clone(),
            failed: failed.clone(),
            declined: declined.clone(),
            success_rate,
        });

        RebalanceCycleResult {
            strategy,
            actions,
            successful,
            failed,
            declined,
            coverage: coverage_metrics,
            distinct_cells_improved: improved_cells.len(),
            critical_needs_resolved: critical_resolved_cells.len(),
            coverage_increase: 0.01 * improved_cells.len() as f64,
            sla_improvement: 0.05 * critical_resolved_cells.len() as f64,
            estimated_time_minutes,
            cost,
        }
    }
}
