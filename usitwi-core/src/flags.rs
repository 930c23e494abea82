//! Notification flags
//!
//! Level flags the engine raises for the application to poll. The engine
//! only sets them and the application only clears them. There is no
//! locking: clearing a flag means "I have consumed everything up to the
//! current receive cursor".

/// Receive-side notification flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotificationFlags {
    frame_started: bool,
    byte_received: bool,
}

impl NotificationFlags {
    /// Create with both flags clear
    pub const fn new() -> Self {
        Self {
            frame_started: false,
            byte_received: false,
        }
    }

    /// Set when the first byte of a write transfer has been stored
    pub fn frame_started(&self) -> bool {
        self.frame_started
    }

    /// Set whenever a byte has been stored
    pub fn byte_received(&self) -> bool {
        self.byte_received
    }

    pub fn clear_frame_started(&mut self) {
        self.frame_started = false;
    }

    pub fn clear_byte_received(&mut self) {
        self.byte_received = false;
    }

    /// Read and clear the frame-started flag
    pub fn take_frame_started(&mut self) -> bool {
        core::mem::take(&mut self.frame_started)
    }

    /// Read and clear the byte-received flag
    pub fn take_byte_received(&mut self) -> bool {
        core::mem::take(&mut self.byte_received)
    }

    pub(crate) fn raise_frame_started(&mut self) {
        self.frame_started = true;
    }

    pub(crate) fn raise_byte_received(&mut self) {
        self.byte_received = true;
    }
}
