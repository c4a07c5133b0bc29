use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::geo::Point;

/// Milliseconds since the Unix epoch. A plain alias rather than a newtype —
/// every collaborator boundary (ETA service, fleet snapshot) speaks this
/// currency directly, so wrapping it buys nothing but conversion noise.
pub type TimestampMs = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    Barq,
    Bullet,
}

impl ServiceType {
    /// Parses a wire-level service type string. `ServiceType` is a closed
    /// Rust enum internally, so `EngineError::UnknownServiceType` can only
    /// ever surface here, at the boundary where untyped input enters.
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "BARQ" | "barq" => Ok(ServiceType::Barq),
            "BULLET" | "bullet" => Ok(ServiceType::Bullet),
            other => Err(EngineError::UnknownServiceType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

/// `(earliest, latest)` delivery window, both epoch-ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: TimestampMs,
    pub latest: TimestampMs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub service_type: ServiceType,
    pub pickup: Point,
    pub dropoff: Point,
    pub time_window: Option<TimeWindow>,
    pub priority: Priority,
    pub created_at: TimestampMs,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_service_types() {
        assert_eq!(ServiceType::parse("BARQ"), Ok(ServiceType::Barq));
        assert_eq!(ServiceType::parse("bullet"), Ok(ServiceType::Bullet));
    }

    #[test]
    fn parse_rejects_unknown_service_types() {
        assert_eq!(
            ServiceType::parse("DRONE"),
            Err(EngineError::UnknownServiceType("DRONE".to_string()))
        );
    }
}
