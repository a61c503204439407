//! FM3 base timer pair in PPG mode.
//!
//! An even channel and the odd channel after it are driven as the two
//! sub-channels of one pulse generator. In PPG mode a channel drives its
//! TIOA pin low for PRLL+1 ticks and high for PRLH+1 ticks, repeatedly.
//! The pair is started with one write to the simultaneous soft-start
//! register so both outputs begin on the same tick.

use core::ptr::write_volatile;

use super::BTSSSR;
use super::base_timer::{BaseTimer, Tmcr, clock_select};
use crate::hal::pulse::{PulseChannel, PulseChannelPair, PulseOutput};

/// TMCR mode bits and (PRLL, PRLH) for an output.
pub(super) fn output_registers(output: PulseOutput) -> (Tmcr, u16, u16) {
    match output {
        PulseOutput::Pulsed { mark, space } => (
            Tmcr::FMD_PPG,
            space.saturating_sub(1),
            mark.saturating_sub(1),
        ),
        PulseOutput::Constant(false) => (Tmcr::FMD_PPG | Tmcr::PMSK, 0, 0),
        PulseOutput::Constant(true) => (Tmcr::FMD_PPG | Tmcr::PMSK | Tmcr::OSEL, 0, 0),
    }
}

/// Two adjacent base timers used as a pulse pair.
#[derive(Debug)]
pub struct PpgPair {
    timers: [BaseTimer; 2],
}

impl PpgPair {
    /// Pair channel `2k` with channel `2k + 1`.
    ///
    /// Returns the timers unchanged if they are not such a pair.
    pub fn new(even: BaseTimer, odd: BaseTimer) -> Result<Self, (BaseTimer, BaseTimer)> {
        if even.index() % 2 != 0 || odd.index() != even.index() + 1 {
            return Err((even, odd));
        }
        Ok(Self {
            timers: [even, odd],
        })
    }

    /// Give the timers back.
    pub fn release(self) -> (BaseTimer, BaseTimer) {
        let [even, odd] = self.timers;
        (even, odd)
    }

    /// BTSSSR bits for `channels`.
    fn start_mask(&self, channels: &[PulseChannel]) -> u16 {
        channels
            .iter()
            .fold(0, |mask, ch| mask | 1 << self.timers[ch.index()].index())
    }
}

impl PulseChannelPair for PpgPair {
    fn set_clock(&mut self, select: u8) {
        let (cks, cks3) = clock_select(select);
        for timer in &mut self.timers {
            let tmcr = (timer.read_tmcr() - Tmcr::CKS - Tmcr::STRG) | cks;
            timer.write_tmcr(tmcr);
            timer.write_tmcr2(cks3);
        }
    }

    fn write_output(&mut self, channel: PulseChannel, output: PulseOutput) {
        let timer = &mut self.timers[channel.index()];
        let (mode, prll, prlh) = output_registers(output);
        let cks = timer.read_tmcr() & Tmcr::CKS;

        timer.write_tmcr(mode | cks);
        unsafe {
            write_volatile(&mut (*timer.regs()).reload_a, prll);
            write_volatile(&mut (*timer.regs()).reload_b, prlh);
        }
    }

    fn start(&mut self, channels: &[PulseChannel]) {
        for ch in channels {
            let timer = &mut self.timers[ch.index()];
            let tmcr = (timer.read_tmcr() - Tmcr::STRG) | Tmcr::CTEN;
            timer.write_tmcr(tmcr);
        }
        let mask = self.start_mask(channels);
        unsafe { write_volatile(BTSSSR as *mut u16, mask) }
    }

    fn stop(&mut self, channel: PulseChannel) {
        let timer = &mut self.timers[channel.index()];
        let tmcr = (timer.read_tmcr() - Tmcr::CTEN - Tmcr::STRG - Tmcr::OSEL) | Tmcr::PMSK;
        timer.write_tmcr(tmcr);
    }
}
