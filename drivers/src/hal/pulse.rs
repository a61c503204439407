//! Pulse generator Hardware Abstraction Layer.
//!
//! Two pulse sub-channels that share one clock select and are started
//! together. Each sub-channel holds its own mark (high) and space (low)
//! width.

/// Sub-channel of a pulse pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PulseChannel {
    Ch0,
    Ch1,
}

impl PulseChannel {
    pub const ALL: [PulseChannel; 2] = [PulseChannel::Ch0, PulseChannel::Ch1];

    pub const fn index(self) -> usize {
        match self {
            PulseChannel::Ch0 => 0,
            PulseChannel::Ch1 => 1,
        }
    }

    pub const fn other(self) -> PulseChannel {
        match self {
            PulseChannel::Ch0 => PulseChannel::Ch1,
            PulseChannel::Ch1 => PulseChannel::Ch0,
        }
    }
}

/// What a sub-channel's output pin does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PulseOutput {
    /// Alternate high for `mark` ticks and low for `space` ticks; both >= 1.
    Pulsed { mark: u16, space: u16 },
    /// Hold the pin at a fixed level.
    Constant(bool),
}

/// Register access for a pulse pair.
pub trait PulseChannelPair {
    /// Write the shared clock select.
    fn set_clock(&mut self, select: u8);

    /// Write one sub-channel's widths and output form, leaving it stopped.
    fn write_output(&mut self, channel: PulseChannel, output: PulseOutput);

    /// Start the given sub-channels in the same write.
    fn start(&mut self, channels: &[PulseChannel]);

    /// Stop one sub-channel and park its output low.
    fn stop(&mut self, channel: PulseChannel);
}
