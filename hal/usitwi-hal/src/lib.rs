//! usitwi Hardware Abstraction Layer
//!
//! This crate defines the peripheral trait that the two-wire slave engine
//! in `usitwi-core` is written against. Any shift-register peripheral with
//! a start-condition detector and an edge counter (the AVR USI, or a
//! bit-level emulation of one) can host the engine by implementing
//! [`UsiPeripheral`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (fills Tx, drains Rx)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usitwi-core (start detector + FSM)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usitwi-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip crate   │       │  sim::SimUsi  │
//! │  (registers)  │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`usi::UsiPeripheral`] - Shift register, counter, triggers and bus lines
//!
//! # Features
//!
//! - `sim` - Software peripheral with wired-AND bus semantics
//! - `defmt` - Enable debug formatting support

#![no_std]
#![deny(unsafe_code)]

pub mod line;
#[cfg(feature = "sim")]
pub mod sim;
pub mod usi;

// Re-export key types at crate root for convenience
pub use line::{Level, LineDirection};
pub use usi::{ShiftWidth, Triggers, UsiPeripheral};
