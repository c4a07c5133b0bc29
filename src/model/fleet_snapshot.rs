use super::driver::{Driver, DriverStatus};
use super::order::ServiceType;

/// Immutable view consumed by a single dispatch/rebalance cycle (§3). Built
/// once from whatever the fleet-status collaborator returns and never
/// mutated afterwards — the engine's output is always a new value, never an
/// in-place edit of the snapshot it was handed.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    available: Vec<Driver>,
    busy: Vec<Driver>,
    offline: Vec<Driver>,
}

impl FleetSnapshot {
    /// Partition an arbitrary driver list into the three buckets by
    /// `status`/`available`, the way the fleet-status provider's contract
    /// (§6) promises.
    pub fn from_drivers(drivers: Vec<Driver>) -> Self {
        let mut available = Vec::new();
        let mut busy = Vec::new();
        let mut offline = Vec::new();
        for driver in drivers {
            match driver.status {
                DriverStatus::Offline => offline.push(driver),
                DriverStatus::Busy => busy.push(driver),
                DriverStatus::Idle | DriverStatus::Available => {
                    if driver.available {
                        available.push(driver);
                    } else {
                        busy.push(driver);
                    }
                }
            }
        }
        Self {
            available,
            busy,
            offline,
        }
    }

    pub fn available(&self) -> &[Driver] {
        &self.available
    }

    pub fn busy(&self) -> &[Driver] {
        &self.busy
    }

    pub fn offline(&self) -> &[Driver] {
        &self.offline
    }

    pub fn all(&self) -> impl Iterator<Item = &Driver> {
        self.available.iter().chain(self.busy.iter()).chain(self.offline.iter())
    }

    /// Available drivers capable of `tier` with remaining capacity, within
    /// `radius_km` of `origin`.
    pub fn available_candidates(
        &self,
        tier: ServiceType,
        origin: crate::geo::Point,
        radius_km: f64,
    ) -> Vec<&Driver> {
        self.available
            .iter()
            .filter(|d| d.supports(tier) && d.capacity.has_room(tier))
            .filter(|d| crate::geo::haversine_km(d.location, origin) <= radius_km)
            .collect()
    }

    /// Busy-but-capable drivers (§4.1.1 step 2) for `tier`.
    pub fn busy_but_capable(&self, tier: ServiceType) -> Vec<&Driver> {
        self.busy.iter().filter(|d| d.can_take_more(tier)).collect()
    }

    /// Idle drivers eligible for repositioning (§4.2.4), excluding those the
    /// caller marks as already active in a reposition plan.
    pub fn idle_eligible_for_reposition<'a>(
        &'a self,
        min_idle_secs: u64,
        already_active: &std::collections::HashSet<String>,
    ) -> Vec<&'a Driver> {
        self.available
            .iter()
            .filter(|d| {
                d.status == DriverStatus::Idle
                    && d.available
                    && d.idle_time_secs > min_idle_secs
                    && !already_active.contains(&d.id)
            })
            .collect()
    }
}
