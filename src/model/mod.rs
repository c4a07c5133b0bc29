//! Shared data model: tagged records for orders, drivers, assignments and
//! the other entities the engine reads and produces. Mirrors §3 of the
//! specification — every shape here is an explicit `struct`/`enum`, never a
//! loosely-typed map, since the source system this crate replaces used
//! implicit dynamic typing throughout.

pub mod assignment;
mod driver;
mod fleet_snapshot;
pub mod order;
mod reposition;
mod restricted_area;

pub use assignment::{Assignment, AssignmentType, TimeWindowFeasibility};
pub use driver::{
    Capacity, Driver, DriverStatus, EstimatedAvailability, FatigueLevel, Performance,
    MAX_BARQ_CAPACITY, MAX_BULLET_CAPACITY,
};
pub use fleet_snapshot::FleetSnapshot;
pub use order::{Order, OrderStatus, Priority, ServiceType, TimeWindow, TimestampMs};
pub use reposition::{RepositionAction, RepositionPriority};
pub use restricted_area::RestrictedArea;
