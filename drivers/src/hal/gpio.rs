//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! Only the input side is needed here: the debounce filter samples pins.

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low (0V or ground).
    Low,
    /// Logic high.
    High,
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value { PinLevel::High } else { PinLevel::Low }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

/// Input pin trait.
///
/// This trait represents a GPIO pin configured as an input.
pub trait InputPin {
    /// Error type for read operations.
    type Error: core::fmt::Debug;

    /// Read the pin state.
    fn read(&self) -> Result<PinLevel, Self::Error>;

    /// Check if the pin is currently high.
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinLevel::High)
    }

    /// Check if the pin is currently low.
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinLevel::Low)
    }
}
