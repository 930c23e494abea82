//! Software-simulated shift-register peripheral
//!
//! [`SimUsi`] models the parts of a USI in two-wire mode that the slave
//! engine depends on: the data register, the SDA direction, the edge
//! counter with its overflow flag, the start flag and the trigger enables.
//!
//! The bus is wired-AND. Each clocked bit is the master's bit ANDed with
//! the slave's bit, where the slave contributes the data register MSB when
//! SDA is an output and a released (high) line otherwise. The sampled bus
//! bit shifts into the data register LSB, exactly like the hardware: the
//! register always ends up holding what was on the wire.

use core::cell::Cell;

use crate::line::{Level, LineDirection};
use crate::usi::{ShiftWidth, Triggers, UsiPeripheral};

/// Simulated universal serial interface
#[derive(Debug, Clone)]
pub struct SimUsi {
    data: u8,
    sda_direction: LineDirection,
    scl_direction: LineDirection,
    lines_released: bool,
    triggers: Triggers,
    start_flag: bool,
    overflow_flag: bool,
    stop_flag: bool,
    /// Bits left before the counter overflows
    remaining_bits: u8,
    armed_width: Option<ShiftWidth>,
    arm_count: u32,
    scl_high: bool,
    sda_high: bool,
    scl_samples: Cell<u32>,
}

impl Default for SimUsi {
    fn default() -> Self {
        Self::new()
    }
}

impl SimUsi {
    /// Create a peripheral in its reset state (everything disabled, SDA input)
    pub fn new() -> Self {
        Self {
            data: 0,
            sda_direction: LineDirection::Input,
            scl_direction: LineDirection::Input,
            lines_released: false,
            triggers: Triggers::NONE,
            start_flag: false,
            overflow_flag: false,
            stop_flag: false,
            remaining_bits: ShiftWidth::Byte.bits(),
            armed_width: None,
            arm_count: 0,
            scl_high: false,
            sda_high: true,
            scl_samples: Cell::new(0),
        }
    }

    // ----- Bus side (driven by a simulated master) -----

    /// Master issues a start (or repeated start) condition
    ///
    /// The start detector latches its flag and holds SCL low. Returns true
    /// when the start interrupt is enabled and should be serviced.
    pub fn signal_start(&mut self) -> bool {
        self.start_flag = true;
        self.start_interrupt_pending()
    }

    /// Master issues a stop condition
    pub fn signal_stop(&mut self) {
        self.stop_flag = true;
    }

    /// Clock one bit with the master either releasing SDA (`true`) or
    /// pulling it low (`false`)
    ///
    /// Returns the level seen on the bus.
    pub fn clock_bit(&mut self, master_high: bool) -> bool {
        let slave_high = match self.sda_direction {
            LineDirection::Output => self.data & 0x80 != 0,
            LineDirection::Input => true,
        };
        let bus = master_high && slave_high;
        self.data = (self.data << 1) | u8::from(bus);

        self.remaining_bits -= 1;
        if self.remaining_bits == 0 {
            self.overflow_flag = true;
            // The 4-bit counter wraps to zero: a full byte until re-armed
            self.remaining_bits = ShiftWidth::Byte.bits();
        }
        bus
    }

    /// Clock eight bits MSB first and return the byte seen on the bus
    pub fn clock_byte(&mut self, master: u8) -> u8 {
        let mut bus = 0u8;
        for bit in (0..8).rev() {
            bus = (bus << 1) | u8::from(self.clock_bit(master & (1 << bit) != 0));
        }
        bus
    }

    /// True when the start flag is set and its interrupt enabled
    pub fn start_interrupt_pending(&self) -> bool {
        self.start_flag && self.triggers.start
    }

    /// True when the overflow flag is set and its interrupt enabled
    pub fn overflow_interrupt_pending(&self) -> bool {
        self.overflow_flag && self.triggers.overflow
    }

    // ----- Scripting -----

    /// Force the SCL level seen by the slave
    pub fn hold_scl_high(&mut self, high: bool) {
        self.scl_high = high;
    }

    /// Force the SDA level seen by the slave while SDA is an input
    pub fn set_sda_level(&mut self, high: bool) {
        self.sda_high = high;
    }

    // ----- Inspection -----

    /// Current data register contents
    pub fn data(&self) -> u8 {
        self.data
    }

    pub fn sda_direction(&self) -> LineDirection {
        self.sda_direction
    }

    pub fn scl_direction(&self) -> LineDirection {
        self.scl_direction
    }

    pub fn triggers(&self) -> Triggers {
        self.triggers
    }

    pub fn lines_released(&self) -> bool {
        self.lines_released
    }

    pub fn start_flag(&self) -> bool {
        self.start_flag
    }

    pub fn overflow_flag(&self) -> bool {
        self.overflow_flag
    }

    pub fn stop_flag(&self) -> bool {
        self.stop_flag
    }

    /// Bits left before the next counter overflow
    pub fn remaining_bits(&self) -> u8 {
        self.remaining_bits
    }

    /// Width used by the most recent `arm_counter` call
    pub fn armed_width(&self) -> Option<ShiftWidth> {
        self.armed_width
    }

    /// Number of `arm_counter` calls so far
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    /// Number of times SCL has been sampled
    pub fn scl_samples(&self) -> u32 {
        self.scl_samples.get()
    }
}

impl UsiPeripheral for SimUsi {
    fn read_data(&self) -> u8 {
        self.data
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    fn set_sda_direction(&mut self, direction: LineDirection) {
        self.sda_direction = direction;
    }

    fn set_scl_direction(&mut self, direction: LineDirection) {
        self.scl_direction = direction;
    }

    fn release_lines(&mut self) {
        self.lines_released = true;
    }

    fn arm_counter(&mut self, width: ShiftWidth) {
        self.overflow_flag = false;
        self.stop_flag = false;
        self.remaining_bits = width.bits();
        self.armed_width = Some(width);
        self.arm_count += 1;
    }

    fn clear_start_condition(&mut self) {
        self.start_flag = false;
    }

    fn clear_all_flags(&mut self) {
        self.start_flag = false;
        self.overflow_flag = false;
        self.stop_flag = false;
        self.remaining_bits = ShiftWidth::Byte.bits();
    }

    fn set_triggers(&mut self, triggers: Triggers) {
        self.triggers = triggers;
    }

    fn scl_level(&self) -> Level {
        self.scl_samples.set(self.scl_samples.get() + 1);
        Level::from(self.scl_high)
    }

    fn sda_level(&self) -> Level {
        match self.sda_direction {
            LineDirection::Output => Level::from(self.sda_high && self.data & 0x80 != 0),
            LineDirection::Input => Level::from(self.sda_high),
        }
    }
}
