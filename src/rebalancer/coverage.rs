//! Coverage analysis (§4.2.2): per-cell tier classification plus citywide
//! coverage metrics.

use crate::config::CoverageThresholds;
use crate::grid::Grid;

const UNDERSERVED_BARQ_DEMAND: f64 = 0.1;
const UNDERSERVED_BULLET_DEMAND: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClassification {
    Underserved,
    Overserved,
    Optimal,
}

pub fn classify(
    barq_drivers: usize,
    bullet_drivers: usize,
    demand_barq: f64,
    demand_bullet: f64,
    thresholds: &CoverageThresholds,
) -> CellClassification {
    let underserved = (barq_drivers < thresholds.min_barq_per_cell && demand_barq > UNDERSERVED_BARQ_DEMAND)
        || (bullet_drivers < thresholds.min_bullet_per_cell && demand_bullet > UNDERSERVED_BULLET_DEMAND);
    if underserved {
        return CellClassification::Underserved;
    }
    if barq_drivers > thresholds.max_barq_per_cell || bullet_drivers > thresholds.max_bullet_per_cell {
        return CellClassification::Overserved;
    }
    CellClassification::Optimal
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageMetrics {
    pub overall_coverage: f64,
    pub barq_coverage: f64,
    pub bullet_coverage: f64,
}

/// Citywide metrics (§4.2.2): fraction of cells with any/BARQ/BULLET
/// coverage. Reads the grid as it stands after the current cycle's grid
/// update, before any repositioning dispatch.
pub fn citywide_metrics(grid: &Grid) -> CoverageMetrics {
    let total = (grid.cell_count().max(1)) as f64;
    let any = grid.cells().iter().filter(|c| !c.drivers.is_empty()).count() as f64;
    let barq = grid.cells().iter().filter(|c| c.barq_driver_count > 0).count() as f64;
    let bullet = grid.cells().iter().filter(|c| c.bullet_driver_count > 0).count() as f64;
    CoverageMetrics {
        overall_coverage: any / total,
        barq_coverage: barq / total,
        bullet_coverage: bullet / total,
    }
}
