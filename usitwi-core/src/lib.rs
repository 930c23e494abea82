//! Interrupt-driven two-wire (I2C/TWI) slave
//!
//! This crate holds the board-agnostic half of a USI-based TWI slave:
//!
//! - Device address matching and direction decoding
//! - Fixed-capacity receive and transmit buffers
//! - Notification flags polled by the application
//! - Start detector (start-condition interrupt)
//! - Shift engine (counter-overflow interrupt state machine)
//! - Critical-section wrapper for sharing the driver with interrupts
//!
//! The engine never blocks and never allocates. Every anomaly (foreign
//! address, master NACK, exhausted transmit buffer) ends the same way: the
//! peripheral is re-armed to wait for the next start condition.
//!
//! # Usage
//!
//! ```ignore
//! static SLAVE: SharedSlave<ChipUsi> = SharedSlave::new();
//!
//! let address = DeviceAddress::new(0x1A)?;
//! let mut slave = UsiTwiSlave::new(chip_usi, SlaveConfig::new(address));
//! slave.init();
//! SLAVE.install(slave);
//!
//! // USI_START vector:    SLAVE.on_start_condition();
//! // USI_OVERFLOW vector: SLAVE.on_counter_overflow();
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod flags;
pub mod shared;
pub mod slave;
pub mod state;

#[cfg(test)]
mod testing;

pub use address::{AddressError, DeviceAddress, Direction};
pub use buffer::{BufferError, RxBuffer, TxBuffer, DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY};
pub use config::SlaveConfig;
pub use engine::{IdleReason, ShiftOutcome};
pub use flags::NotificationFlags;
pub use shared::SharedSlave;
pub use slave::{StartOutcome, UsiTwiSlave};
pub use state::ProtocolState;
