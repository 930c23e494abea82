//! Sharing the slave between interrupt and main context
//!
//! [`SharedSlave`] can live in a `static`. The interrupt vectors forward to
//! [`SharedSlave::on_start_condition`] and
//! [`SharedSlave::on_counter_overflow`]; application code uses
//! [`SharedSlave::with`] for any access that touches more than one byte,
//! which runs inside a critical section and so never tears against the
//! engine.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use usitwi_hal::UsiPeripheral;

use crate::buffer::{DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY};
use crate::engine::ShiftOutcome;
use crate::slave::{StartOutcome, UsiTwiSlave};

/// Slave behind a critical-section mutex
pub struct SharedSlave<
    P,
    const RX: usize = DEFAULT_RX_CAPACITY,
    const TX: usize = DEFAULT_TX_CAPACITY,
> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<UsiTwiSlave<P, RX, TX>>>>,
}

impl<P, const RX: usize, const TX: usize> Default for SharedSlave<P, RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, const RX: usize, const TX: usize> SharedSlave<P, RX, TX> {
    /// Empty slot; interrupts are ignored until a slave is installed
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<P: UsiPeripheral, const RX: usize, const TX: usize> SharedSlave<P, RX, TX> {
    /// Install a slave, returning the previous one
    pub fn install(&self, slave: UsiTwiSlave<P, RX, TX>) -> Option<UsiTwiSlave<P, RX, TX>> {
        self.inner.lock(|cell| cell.borrow_mut().replace(slave))
    }

    /// Remove the slave
    pub fn take(&self) -> Option<UsiTwiSlave<P, RX, TX>> {
        self.inner.lock(|cell| cell.borrow_mut().take())
    }

    /// Run `f` on the slave inside a critical section
    ///
    /// Returns `None` when no slave is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut UsiTwiSlave<P, RX, TX>) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// Start-condition vector
    pub fn on_start_condition(&self) -> Option<StartOutcome> {
        self.with(|slave| slave.on_start_condition())
    }

    /// Counter-overflow vector
    pub fn on_counter_overflow(&self) -> Option<ShiftOutcome> {
        self.with(|slave| slave.on_counter_overflow())
    }
}
