//! Slave configuration
//!
//! Buffer capacities are const generics of [`crate::UsiTwiSlave`]; the
//! values here are the run-time part of the configuration.

use crate::address::DeviceAddress;

/// Default bound on the start detector's clock-hold wait
///
/// The start interrupt itself pulls SCL low, so on real hardware the wait
/// is expected to end within a few iterations. The bound needs validating
/// against bus timing on each new target.
pub const DEFAULT_START_HOLD_SPIN_LIMIT: u16 = 64;

/// Run-time slave configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveConfig {
    /// Own bus address
    pub address: DeviceAddress,
    /// Max SCL samples in the start detector before giving up the wait
    pub start_hold_spin_limit: u16,
}

impl Default for SlaveConfig {
    fn default() -> Self {
        Self::new(DeviceAddress::from_shifted(0))
    }
}

impl SlaveConfig {
    /// Configuration for `address` with the default spin limit
    pub const fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            start_hold_spin_limit: DEFAULT_START_HOLD_SPIN_LIMIT,
        }
    }

    /// Override the start detector's spin limit
    pub const fn with_spin_limit(mut self, limit: u16) -> Self {
        self.start_hold_spin_limit = limit;
        self
    }
}
