//! The coverage grid (§3, §4.2.1): an `R×C` discretisation of the service
//! area. Owned exclusively by the [`crate::rebalancer::FleetRebalancer`];
//! `assign()` never writes it.
//!
//! §9 flags the source's `floor(lat*10) mod R` cell mapping as a toy formula
//! that wraps, and instructs a linear bounding-box mapping instead since
//! nothing depends on legacy cell-id compatibility. This module implements
//! that linear mapping.

use crate::config::GridConfig;
use crate::geo::Point;
use crate::model::TimestampMs;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDemand {
    pub barq: f64,
    pub bullet: f64,
    /// Hours of day (0-23) this cell historically sees elevated demand.
    /// §3 names it alongside `barq`/`bullet`/`averageOrders` but no
    /// coverage/priority rule in §4.2 reads it — kept for model parity,
    /// not wired into a threshold check.
    pub peak_hours: Vec<u8>,
    pub average_orders: f64,
}

impl Default for HistoricalDemand {
    fn default() -> Self {
        Self {
            barq: 0.0,
            bullet: 0.0,
            peak_hours: Vec::new(),
            average_orders: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub center: Point,
    pub drivers: Vec<String>,
    pub barq_driver_count: usize,
    pub bullet_driver_count: usize,
    pub pending_orders: usize,
    pub historical_demand: HistoricalDemand,
    pub coverage_score: f64,
    pub last_updated: TimestampMs,
}

impl Cell {
    fn new(row: usize, col: usize, center: Point) -> Self {
        Self {
            id: format!("cell-{row}-{col}"),
            row,
            col,
            center,
            drivers: Vec::new(),
            barq_driver_count: 0,
            bullet_driver_count: 0,
            pending_orders: 0,
            historical_demand: HistoricalDemand::default(),
            coverage_score: 0.0,
            last_updated: 0,
        }
    }
}

/// Created once at engine init and mutated in place only during a rebalance
/// cycle's grid-update step (§4.2.1) — never destroyed during a run.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    lat_min: f64,
    lat_max: f64,
    lng_min: f64,
    lng_max: f64,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(config: &GridConfig) -> Self {
        let mut cells = Vec::with_capacity(config.rows * config.cols);
        let lat_span = config.lat_max - config.lat_min;
        let lng_span = config.lng_max - config.lng_min;
        for row in 0..config.rows {
            for col in 0..config.cols {
                let center_lat =
                    config.lat_min + lat_span * ((row as f64 + 0.5) / config.rows as f64);
                let center_lng =
                    config.lng_min + lng_span * ((col as f64 + 0.5) / config.cols as f64);
                cells.push(Cell::new(row, col, Point::new(center_lat, center_lng)));
            }
        }
        Self {
            rows: config.rows,
            cols: config.cols,
            lat_min: config.lat_min,
            lat_max: config.lat_max,
            lng_min: config.lng_min,
            lng_max: config.lng_max,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let idx = row * self.cols + col;
        self.cells.get_mut(idx)
    }

    /// Linear bounding-box mapping. Returns `None` if `point` falls outside
    /// the configured box (off-grid points are dropped per §4.2.1).
    pub fn locate(&self, point: Point) -> Option<(usize, usize)> {
        if point.lat < self.lat_min
            || point.lat > self.lat_max
            || point.lng < self.lng_min
            || point.lng > self.lng_max
        {
            return None;
        }
        let lat_span = self.lat_max - self.lat_min;
        let lng_span = self.lng_max - self.lng_min;
        let row = if lat_span > 0.0 {
            (((point.lat - self.lat_min) / lat_span) * self.rows as f64) as usize
        } else {
            0
        };
        let col = if lng_span > 0.0 {
            (((point.lng - self.lng_min) / lng_span) * self.cols as f64) as usize
        } else {
            0
        };
        Some((row.min(self.rows - 1), col.min(self.cols - 1)))
    }

    /// Clears every cell's live `drivers` list. Called at the start of each
    /// rebalance cycle before re-populating from the fleet snapshot.
    pub fn clear_driver_assignments(&mut self) {
        for cell in &mut self.cells {
            cell.drivers.clear();
            cell.barq_driver_count = 0;
            cell.bullet_driver_count = 0;
        }
    }
}
