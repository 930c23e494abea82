//! Shift engine: the counter-overflow half of the protocol
//!
//! Called once per completed shift group (8 data bits or 1 ACK bit). The
//! current [`ProtocolState`] says what the group was; the engine reacts,
//! arms the counter for the next group and records the next state.
//!
//! | State               | Action                                        | Next                |
//! |---------------------|-----------------------------------------------|---------------------|
//! | CheckAddress        | match: ACK, rewind cursor; else idle          | SendData / RequestData |
//! | SendData            | load Tx byte, shift out 8 bits; empty: idle   | RequestReplyForSend |
//! | RequestReplyForSend | release SDA, sample 1 bit                     | CheckReplyForSend   |
//! | CheckReplyForSend   | NACK: idle; ACK: continue as SendData         | RequestReplyForSend |
//! | RequestData         | release SDA, shift in 8 bits                  | GetDataAndAck       |
//! | GetDataAndAck       | store byte if room, always ACK                | RequestData         |

use usitwi_hal::{LineDirection, ShiftWidth, UsiPeripheral};

use crate::address::Direction;
use crate::slave::UsiTwiSlave;
use crate::state::ProtocolState;

/// Why the engine stopped participating in a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleReason {
    /// Address byte targets another device; no ACK was sent
    AddressMismatch,
    /// Master NACKed a transmitted byte
    MasterNack,
    /// Every transmit byte has been sent
    TxExhausted,
}

/// Result of servicing one counter overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftOutcome {
    /// Counter re-armed; the next overflow is handled in this state
    Awaiting(ProtocolState),
    /// Back to listening for a start condition
    Idle(IdleReason),
}

/// One table lookup
enum Step {
    /// Counter armed, wait for the next overflow in this state
    Await(ProtocolState),
    /// Run the action of another state within the same overflow
    Chain(ProtocolState),
    /// Leave the transfer
    Idle(IdleReason),
}

impl<P: UsiPeripheral, const RX: usize, const TX: usize> UsiTwiSlave<P, RX, TX> {
    /// Counter-overflow interrupt
    pub fn on_counter_overflow(&mut self) -> ShiftOutcome {
        let sampled = self.usi.read_data();
        let mut state = self.state;

        // Only CheckReplyForSend chains, and only into SendData, which never
        // chains: at most two lookups per overflow.
        loop {
            match self.step(state, sampled) {
                Step::Chain(next) => state = next,
                Step::Await(next) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("usitwi: {} -> {}", self.state, next);

                    self.state = next;
                    return ShiftOutcome::Awaiting(next);
                }
                Step::Idle(reason) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("usitwi: idle in {} ({})", state, reason);

                    self.force_idle();
                    return ShiftOutcome::Idle(reason);
                }
            }
        }
    }

    fn step(&mut self, state: ProtocolState, sampled: u8) -> Step {
        match state {
            ProtocolState::CheckAddress => {
                if !self.config.address.matches(sampled) {
                    return Step::Idle(IdleReason::AddressMismatch);
                }
                let next = match Direction::from_address_byte(sampled) {
                    Direction::Read => {
                        self.tx.reset_cursor();
                        ProtocolState::SendData
                    }
                    Direction::Write => {
                        self.rx.reset();
                        ProtocolState::RequestData
                    }
                };
                self.send_ack();
                Step::Await(next)
            }

            ProtocolState::SendData => match self.tx.next_byte() {
                Some(byte) => {
                    self.usi.write_data(byte);
                    self.usi.set_sda_direction(LineDirection::Output);
                    self.usi.arm_counter(ShiftWidth::Byte);
                    Step::Await(ProtocolState::RequestReplyForSend)
                }
                None => Step::Idle(IdleReason::TxExhausted),
            },

            ProtocolState::RequestReplyForSend => {
                self.usi.set_sda_direction(LineDirection::Input);
                self.usi.write_data(0);
                self.usi.arm_counter(ShiftWidth::Bit);
                Step::Await(ProtocolState::CheckReplyForSend)
            }

            ProtocolState::CheckReplyForSend => {
                // Released SDA shifted in a 1: the master wants no more data
                if sampled != 0 {
                    Step::Idle(IdleReason::MasterNack)
                } else {
                    Step::Chain(ProtocolState::SendData)
                }
            }

            ProtocolState::RequestData => {
                self.usi.set_sda_direction(LineDirection::Input);
                self.usi.arm_counter(ShiftWidth::Byte);
                Step::Await(ProtocolState::GetDataAndAck)
            }

            ProtocolState::GetDataAndAck => {
                if self.rx.store(sampled) {
                    if self.rx.len() == 1 {
                        self.flags.raise_frame_started();
                    }
                    self.flags.raise_byte_received();
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("usitwi: rx full, dropped {:#x}", sampled);
                }
                // ACK even when the byte was dropped
                self.send_ack();
                Step::Await(ProtocolState::RequestData)
            }
        }
    }
}
