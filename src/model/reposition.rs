use serde::{Deserialize, Serialize};

use crate::geo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RepositionPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositionAction {
    pub driver_id: String,
    pub from: Point,
    pub to: Point,
    pub grid_id: String,
    pub priority: RepositionPriority,
    /// Minutes, estimated travel time to the target cell centre.
    pub estimated_time_minutes: f64,
    pub incentive: f64,
    pub reason: String,
}
