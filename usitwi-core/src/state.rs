//! Protocol state of the shift engine
//!
//! Each state names what the *next* counter overflow means. The start
//! detector resets the state to [`ProtocolState::CheckAddress`]; only the
//! shift engine advances it.

use crate::address::Direction;

/// Shift engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolState {
    /// Address byte has been shifted in
    #[default]
    CheckAddress,
    /// ACK slot done (or master ACKed), next Tx byte goes out
    SendData,
    /// Tx byte shifted out, sample the master's reply next
    RequestReplyForSend,
    /// Master's ACK/NACK bit has been sampled
    CheckReplyForSend,
    /// ACK slot done, shift in the next data byte
    RequestData,
    /// Data byte shifted in, store it and acknowledge
    GetDataAndAck,
}

impl ProtocolState {
    /// Transfer direction this state belongs to
    ///
    /// `None` before the address byte has been decoded.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            ProtocolState::CheckAddress => None,
            ProtocolState::SendData
            | ProtocolState::RequestReplyForSend
            | ProtocolState::CheckReplyForSend => Some(Direction::Read),
            ProtocolState::RequestData | ProtocolState::GetDataAndAck => Some(Direction::Write),
        }
    }
}
