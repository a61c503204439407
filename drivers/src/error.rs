//! Driver error types.
//!
//! Every error is returned at the call that detected it. Nothing is retried:
//! quantization is deterministic, so the caller has to change the request.

use core::fmt;

/// The interval cannot be represented by any clock source and count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuantizationError {
    /// Too long for the counter on the slowest usable clock.
    OutOfRange,
    /// Shorter than one tick of the fastest clock.
    SubTickResolution,
}

impl fmt::Display for QuantizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "interval exceeds the counter range"),
            Self::SubTickResolution => write!(f, "interval is shorter than one clock tick"),
        }
    }
}

impl core::error::Error for QuantizationError {}

/// Interrupt source registration errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The source number is outside the dispatcher table.
    SourceOutOfRange,
    /// Another channel already owns the source.
    SourceBusy,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceOutOfRange => write!(f, "interrupt source out of range"),
            Self::SourceBusy => write!(f, "interrupt source already bound"),
        }
    }
}

impl core::error::Error for DispatchError {}

/// Timer channel errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The operation is not allowed in the channel's current state.
    InvalidState,
    /// The request is wider than the hardware counter.
    UnsupportedWidth,
    Quantization(QuantizationError),
    Dispatch(DispatchError),
}

impl From<QuantizationError> for ChannelError {
    fn from(value: QuantizationError) -> Self {
        Self::Quantization(value)
    }
}

impl From<DispatchError> for ChannelError {
    fn from(value: DispatchError) -> Self {
        Self::Dispatch(value)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => write!(f, "operation invalid in current channel state"),
            Self::UnsupportedWidth => write!(f, "counter width not supported by this timer"),
            Self::Quantization(err) => write!(f, "quantization failed: {err}"),
            Self::Dispatch(err) => write!(f, "dispatch failed: {err}"),
        }
    }
}

impl core::error::Error for ChannelError {}

/// Pulse generator errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PulseError {
    Quantization(QuantizationError),
    /// Mark plus space does not fit the shared 16-bit counter.
    CounterOverflow,
    /// Duty numerator outside the hardware duty range.
    DutyOutOfRange,
    /// Zero, or too high to yield a whole-microsecond period.
    InvalidFrequency,
}

impl From<QuantizationError> for PulseError {
    fn from(value: QuantizationError) -> Self {
        Self::Quantization(value)
    }
}

impl fmt::Display for PulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantization(err) => write!(f, "quantization failed: {err}"),
            Self::CounterOverflow => write!(f, "mark and space overflow the shared counter"),
            Self::DutyOutOfRange => write!(f, "duty cycle out of range"),
            Self::InvalidFrequency => write!(f, "invalid pulse frequency"),
        }
    }
}

impl core::error::Error for PulseError {}
