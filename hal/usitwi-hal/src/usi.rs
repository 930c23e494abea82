//! Universal serial interface abstractions
//!
//! Provides the register-level operations the two-wire slave engine needs
//! from a shift-register peripheral. On the AVR USI these map onto USIDR
//! (data), USISR (status flags and the 4-bit edge counter), USICR (interrupt
//! enables and wire mode) and the port/pin registers of SDA and SCL.

use crate::line::{Level, LineDirection};

/// Number of bits clocked through the shift register before the counter
/// overflows
///
/// The counter advances on both clock edges, so a byte is 16 edges and a
/// single acknowledgement bit is 2 edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftWidth {
    /// 8 data bits
    Byte,
    /// 1 acknowledgement bit
    Bit,
}

impl ShiftWidth {
    /// Counter preload for a 4-bit edge counter overflowing at 16
    pub const fn counter_preload(self) -> u8 {
        match self {
            ShiftWidth::Byte => 0x0,
            ShiftWidth::Bit => 0xE,
        }
    }

    /// Number of data bits shifted
    pub const fn bits(self) -> u8 {
        match self {
            ShiftWidth::Byte => 8,
            ShiftWidth::Bit => 1,
        }
    }
}

/// Interrupt trigger configuration
///
/// The two triggers are independent. Enabling the overflow trigger also
/// selects the two-wire mode that holds SCL low after a counter overflow
/// until the overflow flag is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Triggers {
    /// Start-condition interrupt enabled
    pub start: bool,
    /// Counter-overflow interrupt enabled (with overflow clock hold)
    pub overflow: bool,
}

impl Triggers {
    /// Waiting for a start condition
    pub const LISTEN: Self = Self {
        start: true,
        overflow: false,
    };

    /// Inside a transaction; start stays enabled to catch a repeated start
    pub const ACTIVE: Self = Self {
        start: true,
        overflow: true,
    };

    /// Everything disabled
    pub const NONE: Self = Self {
        start: false,
        overflow: false,
    };
}

impl Default for Triggers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Shift-register peripheral in two-wire mode
///
/// The shift clock is taken from SCL (external, positive edge). Every
/// method is a single register access class and must complete in bounded
/// time, since the engine calls them from interrupt context.
pub trait UsiPeripheral {
    /// Read the shift data register
    fn read_data(&self) -> u8;

    /// Write the shift data register
    ///
    /// When SDA is an output, its level follows the register MSB.
    fn write_data(&mut self, value: u8);

    /// Configure SDA as input (released) or output (driven by the shift register)
    fn set_sda_direction(&mut self, direction: LineDirection);

    /// Configure SCL direction
    ///
    /// With SCL as output the peripheral can hold the clock low after a
    /// start condition or counter overflow.
    fn set_scl_direction(&mut self, direction: LineDirection);

    /// Set both port latches high so the lines idle released
    fn release_lines(&mut self);

    /// Clear the overflow, stop and collision flags and preload the counter
    ///
    /// A pending start-condition flag is left untouched, so a repeated start
    /// arriving while the engine runs is not lost.
    fn arm_counter(&mut self, width: ShiftWidth);

    /// Clear the start-condition flag, releasing the start clock hold
    fn clear_start_condition(&mut self);

    /// Clear every status flag and zero the counter
    fn clear_all_flags(&mut self);

    /// Enable or disable the start and overflow triggers
    fn set_triggers(&mut self, triggers: Triggers);

    /// Sample the current SCL level
    fn scl_level(&self) -> Level;

    /// Sample the current SDA level
    fn sda_level(&self) -> Level;
}
