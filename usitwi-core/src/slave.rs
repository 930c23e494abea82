//! Two-wire slave driver
//!
//! [`UsiTwiSlave`] owns the peripheral together with every piece of
//! transfer state: address, buffers, cursors, notification flags and the
//! protocol state. The two interrupt vectors of the peripheral call
//! [`UsiTwiSlave::on_start_condition`] and
//! [`UsiTwiSlave::on_counter_overflow`]; the application uses the buffer
//! accessors between transfers.
//!
//! The value itself is unsynchronized. Each field has a single writer (the
//! engine or the application), and single-byte updates are atomic on the
//! targets this runs on, but multi-field consistency across an interrupt
//! boundary is not guaranteed. Wrap the driver in
//! [`crate::shared::SharedSlave`] when both contexts need it.

use usitwi_hal::{LineDirection, ShiftWidth, Triggers, UsiPeripheral};

use crate::address::DeviceAddress;
use crate::buffer::{BufferError, RxBuffer, TxBuffer, DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY};
use crate::config::SlaveConfig;
use crate::flags::NotificationFlags;
use crate::state::ProtocolState;

/// How the start detector's clock-hold wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartOutcome {
    /// SCL went low: a genuine start, the clock is held
    ClockHeld,
    /// SDA went high while SCL was still high (stop condition or glitch)
    StopDetected,
    /// Neither happened within the configured number of samples
    SpinLimitReached,
}

/// Interrupt-driven two-wire slave
///
/// `RX` and `TX` are the receive and transmit buffer capacities.
#[derive(Debug)]
pub struct UsiTwiSlave<
    P,
    const RX: usize = DEFAULT_RX_CAPACITY,
    const TX: usize = DEFAULT_TX_CAPACITY,
> {
    pub(crate) usi: P,
    pub(crate) config: SlaveConfig,
    pub(crate) state: ProtocolState,
    pub(crate) in_transaction: bool,
    pub(crate) rx: RxBuffer<RX>,
    pub(crate) tx: TxBuffer<TX>,
    pub(crate) flags: NotificationFlags,
}

impl<P: UsiPeripheral, const RX: usize, const TX: usize> UsiTwiSlave<P, RX, TX> {
    /// Create a slave around `usi`
    ///
    /// The peripheral is not touched until [`init`](Self::init).
    pub fn new(usi: P, config: SlaveConfig) -> Self {
        Self {
            usi,
            config,
            state: ProtocolState::CheckAddress,
            in_transaction: false,
            rx: RxBuffer::new(),
            tx: TxBuffer::new(),
            flags: NotificationFlags::new(),
        }
    }

    /// Put the peripheral in two-wire slave mode, listening for a start
    ///
    /// Both lines idle released, SCL is an output so the peripheral can
    /// hold the clock, SDA is an input, and only the start trigger is
    /// enabled. Safe to call again at any time.
    pub fn init(&mut self) {
        self.usi.release_lines();
        self.usi.set_scl_direction(LineDirection::Output);
        self.usi.set_sda_direction(LineDirection::Input);
        self.usi.set_triggers(Triggers::LISTEN);
        self.usi.clear_all_flags();
        self.in_transaction = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("usitwi: listening on {:#x}", self.config.address.value());
    }

    /// Start-condition interrupt
    ///
    /// Arms the counter for the address byte and resets the protocol state,
    /// including on a repeated start mid-transfer. Buffers are untouched.
    pub fn on_start_condition(&mut self) -> StartOutcome {
        self.usi.set_sda_direction(LineDirection::Input);
        // Start stays enabled to catch a repeated start
        self.usi.set_triggers(Triggers::ACTIVE);

        let outcome = self.wait_for_clock_hold();

        self.usi.clear_start_condition();
        self.usi.arm_counter(ShiftWidth::Byte);
        self.state = ProtocolState::CheckAddress;
        self.in_transaction = true;

        #[cfg(feature = "defmt")]
        defmt::trace!("usitwi: start ({})", outcome);

        outcome
    }

    /// Bounded wait while SCL is still high after the start edge
    ///
    /// The start interrupt pulls SCL low, so this normally ends at once.
    /// SDA rising first means the master issued a stop instead.
    fn wait_for_clock_hold(&self) -> StartOutcome {
        for _ in 0..self.config.start_hold_spin_limit {
            if self.usi.scl_level().is_low() {
                return StartOutcome::ClockHeld;
            }
            if self.usi.sda_level().is_high() {
                return StartOutcome::StopDetected;
            }
        }
        StartOutcome::SpinLimitReached
    }

    /// Return to listening for the next start condition
    ///
    /// The only way out of a transfer. SDA is released, so any ACK slot
    /// that follows reads as NACK on the bus.
    pub(crate) fn force_idle(&mut self) {
        self.usi.set_sda_direction(LineDirection::Input);
        self.usi.set_triggers(Triggers::LISTEN);
        self.usi.arm_counter(ShiftWidth::Byte);
        self.in_transaction = false;
    }

    /// Drive an ACK in the next bit slot
    pub(crate) fn send_ack(&mut self) {
        self.usi.write_data(0);
        self.usi.set_sda_direction(LineDirection::Output);
        self.usi.arm_counter(ShiftWidth::Bit);
    }

    // ----- Application side -----

    /// Bytes received in the current (or last) write transfer
    pub fn received(&self) -> &[u8] {
        self.rx.as_slice()
    }

    /// Receive cursor: number of bytes stored this transfer
    pub fn rx_len(&self) -> usize {
        self.rx.len()
    }

    pub fn rx(&self) -> &RxBuffer<RX> {
        &self.rx
    }

    /// Transmit buffer contents, to fill between transfers
    pub fn tx_buffer_mut(&mut self) -> &mut [u8] {
        self.tx.as_mut_slice()
    }

    /// Copy `data` into the start of the transmit buffer
    pub fn load_tx(&mut self, data: &[u8]) -> Result<(), BufferError> {
        self.tx.load(data)
    }

    /// Rewind the transmit cursor
    pub fn reset_tx_cursor(&mut self) {
        self.tx.reset_cursor();
    }

    /// Number of bytes handed to the shift register since the last rewind
    pub fn tx_cursor(&self) -> usize {
        self.tx.cursor()
    }

    pub fn tx(&self) -> &TxBuffer<TX> {
        &self.tx
    }

    pub fn flags(&self) -> NotificationFlags {
        self.flags
    }

    pub fn clear_frame_started(&mut self) {
        self.flags.clear_frame_started();
    }

    pub fn clear_byte_received(&mut self) {
        self.flags.clear_byte_received();
    }

    /// Read and clear the frame-started flag
    pub fn take_frame_started(&mut self) -> bool {
        self.flags.take_frame_started()
    }

    /// Read and clear the byte-received flag
    pub fn take_byte_received(&mut self) -> bool {
        self.flags.take_byte_received()
    }

    pub fn address(&self) -> DeviceAddress {
        self.config.address
    }

    /// Change the bus address; takes effect at the next address byte
    pub fn set_address(&mut self, address: DeviceAddress) {
        self.config.address = address;
    }

    pub fn config(&self) -> &SlaveConfig {
        &self.config
    }

    /// Current protocol state
    ///
    /// Left unchanged when a transfer ends; see
    /// [`in_transaction`](Self::in_transaction).
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// True between a start condition and the return to listening
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn peripheral(&self) -> &P {
        &self.usi
    }

    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.usi
    }

    /// Give back the peripheral
    pub fn release(self) -> P {
        self.usi
    }
}
