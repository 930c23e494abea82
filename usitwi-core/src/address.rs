//! Device address handling
//!
//! The first byte of every transaction carries the 7-bit target address in
//! bits 7..1 and the transfer direction in bit 0. The device address is
//! stored pre-shifted so matching is a single masked compare.

/// Mask selecting the address bits of an address byte
const ADDRESS_MASK: u8 = 0xFE;

/// Mask selecting the direction bit of an address byte
const DIRECTION_MASK: u8 = 0x01;

/// Largest valid 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Errors from address configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Value does not fit in 7 bits
    OutOfRange,
}

/// Transfer direction requested by the master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master writes, slave receives (direction bit 0)
    Write,
    /// Master reads, slave transmits (direction bit 1)
    Read,
}

impl Direction {
    /// Decode the direction bit of an address byte
    pub const fn from_address_byte(byte: u8) -> Self {
        if byte & DIRECTION_MASK != 0 {
            Direction::Read
        } else {
            Direction::Write
        }
    }
}

/// The device's own 7-bit bus address, stored pre-shifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Create an address from its 7-bit value
    pub const fn new(address: u8) -> Result<Self, AddressError> {
        if address > MAX_ADDRESS {
            return Err(AddressError::OutOfRange);
        }
        Ok(Self(address << 1))
    }

    /// Create an address from an already shifted byte
    ///
    /// The direction bit is masked off.
    pub const fn from_shifted(byte: u8) -> Self {
        Self(byte & ADDRESS_MASK)
    }

    /// The 7-bit address value
    pub const fn value(self) -> u8 {
        self.0 >> 1
    }

    /// The address in address-byte position (bit 0 clear)
    pub const fn shifted(self) -> u8 {
        self.0
    }

    /// Check whether an incoming address byte targets this device
    pub const fn matches(self, address_byte: u8) -> bool {
        address_byte & ADDRESS_MASK == self.0
    }

    /// Address byte a master sends to start a transfer in `direction`
    pub const fn address_byte(self, direction: Direction) -> u8 {
        match direction {
            Direction::Write => self.0,
            Direction::Read => self.0 | DIRECTION_MASK,
        }
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = AddressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
