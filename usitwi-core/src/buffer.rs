//! Fixed-capacity transfer buffers
//!
//! Capacities are const generics fixed at build time. Nothing here
//! allocates.

use heapless::Vec;

/// Default receive buffer capacity
pub const DEFAULT_RX_CAPACITY: usize = 12;

/// Default transmit buffer capacity
pub const DEFAULT_TX_CAPACITY: usize = 20;

/// Errors from buffer access by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Data longer than the buffer capacity
    TooLong,
}

/// Bytes written by the master in the current (or last) write transfer
///
/// The write cursor is the vector length. Bytes arriving once the buffer
/// is full are dropped; the transfer itself carries on.
#[derive(Debug, Clone, Default)]
pub struct RxBuffer<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> RxBuffer<N> {
    /// Create an empty receive buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Rewind the write cursor
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Store a byte at the cursor
    ///
    /// Returns false when the buffer is full and the byte was dropped.
    pub fn store(&mut self, byte: u8) -> bool {
        self.bytes.push(byte).is_ok()
    }

    /// Bytes received so far
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Write cursor position
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Bytes offered to the master on the next read transfer
///
/// The application owns the contents between transfers; the engine only
/// reads them, advancing the cursor once per byte sent.
#[derive(Debug, Clone)]
pub struct TxBuffer<const N: usize> {
    bytes: [u8; N],
    cursor: usize,
}

impl<const N: usize> Default for TxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TxBuffer<N> {
    /// Create a zero-filled transmit buffer
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            cursor: 0,
        }
    }

    /// Rewind the read cursor
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Take the byte at the cursor and advance it
    ///
    /// Returns `None` once every byte has been sent.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.cursor)?;
        self.cursor += 1;
        Some(byte)
    }

    /// Number of bytes sent since the last rewind
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the cursor has reached the end of the buffer
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= N
    }

    /// Buffer contents
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable buffer contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Copy `data` into the start of the buffer
    ///
    /// Bytes past `data.len()` keep their previous value.
    pub fn load(&mut self, data: &[u8]) -> Result<(), BufferError> {
        let dest = self.bytes.get_mut(..data.len()).ok_or(BufferError::TooLong)?;
        dest.copy_from_slice(data);
        Ok(())
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
