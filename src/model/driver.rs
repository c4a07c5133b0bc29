use serde::{Deserialize, Serialize};

use super::order::{ServiceType, TimestampMs};
use crate::geo::Point;

/// Maximum BARQ slots a single driver can ever hold.
pub const MAX_BARQ_CAPACITY: i32 = 5;
/// Maximum BULLET slots a single driver can ever hold.
pub const MAX_BULLET_CAPACITY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverStatus {
    Idle,
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueLevel {
    Low,
    Medium,
    High,
}

impl FatigueLevel {
    /// Sub-score used by the BARQ/BULLET fatigue factor (§4.1.2).
    pub fn sub_score(self) -> f64 {
        match self {
            FatigueLevel::Low => 1.0,
            FatigueLevel::Medium => 0.7,
            FatigueLevel::High => 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// In `[0,1]`; `0.8` is used as the scoring default when absent upstream.
    pub rating: f64,
}

impl Default for Performance {
    fn default() -> Self {
        Self { rating: 0.8 }
    }
}

/// Remaining slots per tier. Invariant (enforced by the fleet-status
/// provider, not re-checked here): `len(currentOrders[tier]) + capacity[tier]
/// == maxCapacity[tier]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub barq: i32,
    pub bullet: i32,
}

impl Capacity {
    pub fn remaining(&self, tier: ServiceType) -> i32 {
        match tier {
            ServiceType::Barq => self.barq,
            ServiceType::Bullet => self.bullet,
        }
    }

    pub fn has_room(&self, tier: ServiceType) -> bool {
        self.remaining(tier) > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EstimatedAvailability {
    Immediate,
    At(TimestampMs),
}

impl EstimatedAvailability {
    /// Minutes until available, relative to `now_ms`. `0` if immediate or
    /// already past.
    pub fn minutes_until(self, now_ms: TimestampMs) -> f64 {
        match self {
            EstimatedAvailability::Immediate => 0.0,
            EstimatedAvailability::At(t) => {
                if t <= now_ms {
                    0.0
                } else {
                    (t - now_ms) as f64 / 60_000.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub service_capability: Vec<ServiceType>,
    pub location: Point,
    pub status: DriverStatus,
    pub available: bool,
    pub capacity: Capacity,
    /// Order ids currently assigned to this driver, per tier.
    pub current_barq_orders: Vec<String>,
    pub current_bullet_orders: Vec<String>,
    pub idle_time_secs: u64,
    pub rating: f64,
    pub fatigue: FatigueLevel,
    pub performance: Performance,
    pub estimated_availability: EstimatedAvailability,
}

impl Driver {
    pub fn supports(&self, tier: ServiceType) -> bool {
        self.service_capability.contains(&tier)
    }

    /// §4.1.1 step 2/§4.1.2: busy drivers that still have room and can
    /// therefore accept another order on top of their current trip.
    pub fn can_take_more(&self, tier: ServiceType) -> bool {
        self.supports(tier) && self.capacity.has_room(tier)
    }
}
