//! FM3 Watch Counter Driver
//!
//! A 6-bit down counter clocked by the prescaled 32.768 kHz sub clock. It
//! reloads from WCRL on every underflow and sets WCIF. There is no software
//! trigger and no one-shot mode: counting starts when WCEN is set and the
//! first interval is only complete after a full count.

use bitflags::bitflags;
use core::ptr::{read_volatile, write_volatile};

use super::flag::RegisterFlag;
use super::{WATCH_SOURCE, WC_BASE};
use crate::hal::interrupt::{AckOrder, IrqNumber};
use crate::hal::timer::{TimerHardware, TimerMode, Trigger};
use crate::quantize::CounterWidth;

bitflags! {
    /// Watch counter control register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Wccr: u8 {
        const WCEN = 1 << 7;
        /// Counter running (read only).
        const WCOP = 1 << 6;
        /// Prescale select.
        const CS = 0b11 << 2;
        const WCIE = 1 << 1;
        /// Underflow request, write 0 to clear.
        const WCIF = 1 << 0;
    }
}

bitflags! {
    /// Clock enable register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ClkEn: u8 {
        const CLK_EN = 1 << 0;
        /// Clock running (read only).
        const CLK_EN_R = 1 << 1;
    }
}

const COUNT_MASK: u8 = 0x3F;

#[repr(C)]
struct Registers {
    wcrd: u8,
    wcrl: u8,
    wccr: u8,
    _reserved0: [u8; 13],
    clk_sel: u16,
    _reserved1: u16,
    clk_en: u8,
}

/// WCCR for prescale `select`, keeping the enable bits of `current`.
fn wccr_with_select(current: Wccr, select: u8) -> Wccr {
    let cs = Wccr::from_bits_retain((select & 0b11) << 2);
    (current - Wccr::CS - Wccr::WCOP) | cs | Wccr::WCIF
}

/// The watch counter.
#[derive(Debug)]
pub struct WatchCounter {
    base: usize,
}

impl WatchCounter {
    /// Create a handle and enable the sub clock input.
    ///
    /// # Safety
    ///
    /// The registers must be mapped, the sub oscillator running, and no
    /// other handle may exist. Use [`Peripherals::take`](super::Peripherals::take).
    pub unsafe fn new() -> Self {
        let mut wc = Self { base: WC_BASE };
        wc.enable_clock();
        wc
    }

    #[inline(always)]
    fn regs(&self) -> *mut Registers {
        self.base as *mut Registers
    }

    fn enable_clock(&mut self) {
        unsafe {
            // SEL_IN = 0: sub clock
            write_volatile(&mut (*self.regs()).clk_sel, 0);
            write_volatile(&mut (*self.regs()).clk_en, ClkEn::CLK_EN.bits());
            while read_volatile(&(*self.regs()).clk_en) & ClkEn::CLK_EN_R.bits() == 0 {
                core::hint::spin_loop();
            }
        }
    }

    fn read_wccr(&self) -> Wccr {
        Wccr::from_bits_retain(unsafe { read_volatile(&(*self.regs()).wccr) })
    }

    /// Write WCCR without touching WCIF unless it is in `clear`.
    fn write_wccr(&mut self, wccr: Wccr, clear: Wccr) {
        let value = (wccr | Wccr::WCIF) - Wccr::WCOP - clear;
        unsafe { write_volatile(&mut (*self.regs()).wccr, value.bits()) }
    }
}

impl TimerHardware for WatchCounter {
    type Flag = RegisterFlag;

    fn counter_width(&self) -> CounterWidth {
        CounterWidth::Bits6
    }

    fn trigger(&self) -> Trigger {
        Trigger::Continuous
    }

    fn source(&self) -> IrqNumber {
        WATCH_SOURCE
    }

    /// The counter reloads by itself and cannot underflow again for at least
    /// 125 ms, so the hook can inspect WCIF before it is cleared.
    fn ack_order(&self) -> AckOrder {
        AckOrder::ClearAfterInvoke
    }

    fn request_flag(&self) -> RegisterFlag {
        let wccr = self.base + core::mem::offset_of!(Registers, wccr);
        unsafe {
            RegisterFlag::new(
                wccr,
                Wccr::WCIF.bits(),
                Wccr::WCIE.bits(),
                Wccr::WCIF.bits(),
            )
        }
    }

    /// `mode` is ignored; one-shot channels rely on the dispatcher disarming
    /// the request after the first delivery.
    fn program(&mut self, select: u8, count: u32, _mode: TimerMode) {
        let wccr = wccr_with_select(self.read_wccr(), select);
        self.write_wccr(wccr, Wccr::empty());
        unsafe { write_volatile(&mut (*self.regs()).wcrl, count as u8 & COUNT_MASK) }
    }

    fn clear_request(&mut self) {
        let wccr = self.read_wccr();
        self.write_wccr(wccr, Wccr::WCIF);
    }

    fn set_interrupt(&mut self, enabled: bool) {
        let mut wccr = self.read_wccr();
        wccr.set(Wccr::WCIE, enabled);
        self.write_wccr(wccr, Wccr::empty());
    }

    fn set_counting(&mut self, enabled: bool) {
        let mut wccr = self.read_wccr();
        wccr.set(Wccr::WCEN, enabled);
        self.write_wccr(wccr, Wccr::empty());
    }

    fn software_trigger(&mut self) {}

    fn count(&self) -> u32 {
        (unsafe { read_volatile(&(*self.regs()).wcrd) } & COUNT_MASK) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fm3::WATCH_DIVIDERS;

    #[test]
    fn register_layout() {
        assert_eq!(core::mem::offset_of!(Registers, wcrl), 0x01);
        assert_eq!(core::mem::offset_of!(Registers, wccr), 0x02);
        assert_eq!(core::mem::offset_of!(Registers, clk_sel), 0x10);
        assert_eq!(core::mem::offset_of!(Registers, clk_en), 0x14);
    }

    #[test]
    fn select_replaces_only_the_prescale_bits() {
        let running = Wccr::WCEN | Wccr::WCOP | Wccr::WCIE | Wccr::CS;
        let wccr = wccr_with_select(running, 1);
        assert_eq!(wccr, Wccr::WCEN | Wccr::WCIE | Wccr::WCIF | Wccr::from_bits_retain(0b01 << 2));
    }

    #[test]
    fn table_selects_fit_the_field() {
        for divider in WATCH_DIVIDERS {
            assert!(divider.select <= 0b11);
        }
    }
}
