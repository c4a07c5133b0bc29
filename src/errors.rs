//! Error kinds per the propagation policy: most failures are contained and
//! surfaced as warnings on the affected record rather than aborting a cycle.
//! Only [`EngineError::UnknownServiceType`] and the Route Enhancement
//! geometry errors are returned to a caller.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// `order.serviceType` is not `BARQ` or `BULLET`. Fatal for the call.
    UnknownServiceType(String),
    /// Route Enhancement received fewer than 2 usable stops, or a restricted
    /// area polygon with fewer than 3 vertices.
    InvalidGeometry(String),
    /// Bootstrapping error: bad grid size or a required collaborator missing.
    Configuration(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownServiceType(s) => {
                write!(f, "unknown service type: {s}")
            }
            EngineError::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            EngineError::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Non-fatal signals folded into a cycle/assignment's own bookkeeping instead
/// of propagating as `Err`. Kept as a type so call sites can match on them
/// when building `reasoning`/`warnings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainedFailure {
    NoCandidates,
    RouterTimeout,
    RouterFailure,
    RouterBadPayload,
    EtaUnavailable,
    DispatchDeclined,
}

impl fmt::Display for ContainedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ContainedFailure::NoCandidates => "no eligible candidates",
            ContainedFailure::RouterTimeout => "external router timed out",
            ContainedFailure::RouterFailure => "external router call failed",
            ContainedFailure::RouterBadPayload => "external router returned a malformed payload",
            ContainedFailure::EtaUnavailable => "ETA service unavailable",
            ContainedFailure::DispatchDeclined => "reposition request was declined",
        };
        f.write_str(msg)
    }
}
