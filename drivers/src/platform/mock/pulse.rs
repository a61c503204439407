use super::MockIrq;
use crate::hal::pulse::{PulseChannel, PulseChannelPair, PulseOutput};

/// Pulse pair register model.
#[derive(Debug, Default)]
pub struct MockPulsePair {
    pub clock_select: Option<u8>,
    pub outputs: [Option<PulseOutput>; 2],
    pub running: [bool; 2],
    pub starts: u32,
    pub unmasked_writes: u32,
}

impl MockPulsePair {
    fn record_write(&mut self) {
        if !MockIrq::masked() {
            self.unmasked_writes += 1;
        }
    }
}

impl PulseChannelPair for MockPulsePair {
    fn set_clock(&mut self, select: u8) {
        self.record_write();
        self.clock_select = Some(select);
    }

    fn write_output(&mut self, channel: PulseChannel, output: PulseOutput) {
        self.record_write();
        self.running[channel.index()] = false;
        self.outputs[channel.index()] = Some(output);
    }

    fn start(&mut self, channels: &[PulseChannel]) {
        self.record_write();
        self.starts += 1;
        for ch in channels {
            self.running[ch.index()] = true;
        }
    }

    fn stop(&mut self, channel: PulseChannel) {
        self.record_write();
        self.running[channel.index()] = false;
    }
}
