//! Bus line abstractions
//!
//! SDA and SCL are open-drain lines. A line configured as an input is
//! released and floats high through the bus pull-ups unless another
//! device pulls it low.

/// Logic level sampled on a bus line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check if the level is high (logic 1)
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Check if the level is low (logic 0)
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction of a bus line as seen from the slave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineDirection {
    /// Released; the slave only samples the line
    Input,
    /// Driven by the shift register output (SDA) or the port latch (SCL)
    Output,
}
