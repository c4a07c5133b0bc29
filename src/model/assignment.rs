use serde::{Deserialize, Serialize};

use super::order::TimestampMs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentType {
    Immediate,
    Batched,
    AddedToRoute,
    Emergency,
    Queued,
    QueuedPriority,
}

/// Feasibility of an order's declared time window given the chosen driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindowFeasibility {
    OnTime,
    Tight,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub order_id: String,
    pub assigned_driver: Option<String>,
    pub assignment_type: AssignmentType,
    pub batch_id: Option<String>,
    pub estimated_pickup_time: TimestampMs,
    pub estimated_delivery_time: TimestampMs,
    /// `[0,1]`; equal to `score` per §8's quantified invariants.
    pub confidence: f64,
    pub score: f64,
    /// Up to 3 runner-up candidates, ranked best first.
    pub backup_drivers: Vec<String>,
    pub time_window_feasibility: Option<TimeWindowFeasibility>,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
}

impl Assignment {
    pub fn queued(order_id: String, reason: &str) -> Self {
        Self {
            order_id,
            assigned_driver: None,
            assignment_type: AssignmentType::Queued,
            batch_id: None,
            estimated_pickup_time: 0,
            estimated_delivery_time: 0,
            confidence: 0.0,
            score: 0.0,
            backup_drivers: Vec::new(),
            time_window_feasibility: None,
            reasoning: vec![reason.to_string()],
            warnings: Vec::new(),
        }
    }
}
