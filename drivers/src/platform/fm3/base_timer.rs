//! FM3 Base Timer Driver
//!
//! Each base timer channel is a 16-bit down counter whose function is chosen
//! through TMCR.FMD. This driver uses reload-timer mode: the counter loads
//! TMRLRA on a software trigger, counts down and raises UDIR on underflow.
//! With MDSE set it stops after the first underflow.

use bitflags::bitflags;
use core::ptr::{read_volatile, write_volatile};

use super::flag::RegisterFlag;
use super::{BASE_TIMER_SOURCE, BT_BASE, BT_STRIDE};
use crate::hal::interrupt::{AckOrder, IrqNumber};
use crate::hal::timer::{TimerHardware, TimerMode, Trigger};
use crate::quantize::CounterWidth;

bitflags! {
    /// Timer control register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Tmcr: u16 {
        /// Count clock select, low three bits.
        const CKS = 0b111 << 12;
        /// Restart on trigger while counting.
        const RTGEN = 1 << 11;
        /// Force the output to its idle level.
        const PMSK = 1 << 10;
        const EGS = 0b11 << 8;
        const FMD = 0b111 << 4;
        const FMD_PPG = 0b010 << 4;
        const FMD_RELOAD = 0b011 << 4;
        /// Invert the output.
        const OSEL = 1 << 3;
        /// One-shot.
        const MDSE = 1 << 2;
        const CTEN = 1 << 1;
        /// Software trigger.
        const STRG = 1 << 0;
    }
}

bitflags! {
    /// Timer control register 2.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Tmcr2: u8 {
        /// Count clock select, high bit.
        const CKS3 = 1 << 0;
    }
}

bitflags! {
    /// Status control register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Stc: u8 {
        /// Underflow request.
        const UDIR = 1 << 0;
        /// Duty match request.
        const DTIR = 1 << 1;
        /// Trigger request.
        const TGIR = 1 << 2;
        const UDIE = 1 << 4;
        const DTIE = 1 << 5;
        const TGIE = 1 << 6;

        /// Write-zero-to-clear bits.
        const REQUESTS = Self::UDIR.bits() | Self::DTIR.bits() | Self::TGIR.bits();
    }
}

/// Memory-mapped base timer registers.
///
/// The two reload registers are TMRLRA/TMRLRB in reload-timer mode and
/// PRLL/PRLH in PPG mode.
#[repr(C)]
pub(super) struct Registers {
    pub reload_a: u16,
    _reserved0: u16,
    pub reload_b: u16,
    _reserved1: u16,
    pub tmr: u16,
    _reserved2: u16,
    pub tmcr: u16,
    _reserved3: u16,
    pub stc: u8,
    pub tmcr2: u8,
}

/// Split a 4-bit clock select over TMCR.CKS and TMCR2.CKS3.
pub(super) fn clock_select(select: u8) -> (Tmcr, Tmcr2) {
    let cks = Tmcr::from_bits_retain(((select & 0b111) as u16) << 12);
    let cks3 = if select & 0b1000 != 0 {
        Tmcr2::CKS3
    } else {
        Tmcr2::empty()
    };
    (cks, cks3)
}

/// Reload register value for a period of `count` ticks.
pub(super) fn reload_value(count: u32) -> u16 {
    count.saturating_sub(1).min(u16::MAX as u32) as u16
}

/// One base timer channel in reload-timer mode.
#[derive(Debug)]
pub struct BaseTimer {
    index: u8,
    base: usize,
}

impl BaseTimer {
    /// Create a handle for channel `index`.
    ///
    /// # Safety
    ///
    /// The channel's registers must be mapped and no other handle for the
    /// same channel may exist. Use [`Peripherals::take`](super::Peripherals::take).
    pub const unsafe fn new(index: u8) -> Self {
        Self {
            index,
            base: BT_BASE + index as usize * BT_STRIDE,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    #[inline(always)]
    pub(super) fn regs(&self) -> *mut Registers {
        self.base as *mut Registers
    }

    pub(super) fn read_tmcr(&self) -> Tmcr {
        Tmcr::from_bits_retain(unsafe { read_volatile(&(*self.regs()).tmcr) })
    }

    pub(super) fn write_tmcr(&mut self, tmcr: Tmcr) {
        unsafe { write_volatile(&mut (*self.regs()).tmcr, tmcr.bits()) }
    }

    pub(super) fn write_tmcr2(&mut self, tmcr2: Tmcr2) {
        unsafe { write_volatile(&mut (*self.regs()).tmcr2, tmcr2.bits()) }
    }

    fn read_stc(&self) -> Stc {
        Stc::from_bits_retain(unsafe { read_volatile(&(*self.regs()).stc) })
    }

    /// Write STC with every request bit set except those in `clear`.
    fn write_stc(&mut self, stc: Stc, clear: Stc) {
        let value = (stc | Stc::REQUESTS) - clear;
        unsafe { write_volatile(&mut (*self.regs()).stc, value.bits()) }
    }

    fn modify_tmcr(&mut self, f: impl FnOnce(Tmcr) -> Tmcr) {
        let tmcr = f(self.read_tmcr());
        self.write_tmcr(tmcr);
    }
}

impl TimerHardware for BaseTimer {
    type Flag = RegisterFlag;

    fn counter_width(&self) -> CounterWidth {
        CounterWidth::Bits16
    }

    fn trigger(&self) -> Trigger {
        Trigger::Software
    }

    fn source(&self) -> IrqNumber {
        BASE_TIMER_SOURCE + self.index as IrqNumber
    }

    /// UDIR latches again on the next underflow. Clearing it before the hook
    /// runs keeps an underflow that happens during a long hook pending.
    fn ack_order(&self) -> AckOrder {
        AckOrder::ClearBeforeInvoke
    }

    fn request_flag(&self) -> RegisterFlag {
        let stc = self.base + core::mem::offset_of!(Registers, stc);
        unsafe {
            RegisterFlag::new(
                stc,
                Stc::UDIR.bits(),
                Stc::UDIE.bits(),
                Stc::REQUESTS.bits(),
            )
        }
    }

    fn program(&mut self, select: u8, count: u32, mode: TimerMode) {
        let (cks, cks3) = clock_select(select);
        let mut tmcr = Tmcr::FMD_RELOAD | cks;
        if mode == TimerMode::OneShot {
            tmcr |= Tmcr::MDSE;
        }

        // FMD resets the channel; write it with counting disabled first
        self.write_tmcr(tmcr);
        self.write_tmcr2(cks3);
        unsafe { write_volatile(&mut (*self.regs()).reload_a, reload_value(count)) }
    }

    fn clear_request(&mut self) {
        let stc = self.read_stc();
        self.write_stc(stc, Stc::UDIR);
    }

    fn set_interrupt(&mut self, enabled: bool) {
        let mut stc = self.read_stc();
        stc.set(Stc::UDIE, enabled);
        self.write_stc(stc, Stc::empty());
    }

    fn set_counting(&mut self, enabled: bool) {
        self.modify_tmcr(|mut tmcr| {
            tmcr.set(Tmcr::CTEN, enabled);
            tmcr.remove(Tmcr::STRG);
            tmcr
        });
    }

    fn software_trigger(&mut self) {
        self.modify_tmcr(|tmcr| tmcr | Tmcr::CTEN | Tmcr::STRG);
    }

    fn count(&self) -> u32 {
        unsafe { read_volatile(&(*self.regs()).tmr) as u32 }
    }
}
