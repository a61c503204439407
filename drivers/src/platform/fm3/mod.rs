//! Fujitsu FM3 (Cortex-M3) timer peripherals.
//!
//! - [`BaseTimer`]: 16-bit reload timer, one per base timer channel
//! - [`PpgPair`]: two base timers as a pulse pair
//! - [`WatchCounter`]: 6-bit wake-up counter on the sub clock
//!
//! Every base timer channel shares the BT0-7 vector and the watch counter
//! has its own; both handlers call
//! [`InterruptDispatcher::dispatch_pending`](crate::dispatch::InterruptDispatcher::dispatch_pending)
//! or dispatch the watch source directly.

mod base_timer;
mod flag;
mod ppg;
mod watch;

use core::sync::atomic::{AtomicBool, Ordering};

use crate::clock::{ClockDomain, Divider};
use crate::hal::interrupt::IrqNumber;

pub use base_timer::{BaseTimer, Stc, Tmcr, Tmcr2};
pub use flag::RegisterFlag;
pub use ppg::PpgPair;
pub use watch::{Wccr, WatchCounter};

/// Base timer ch.0 register block.
pub const BT_BASE: usize = 0x4002_5000;
/// Distance between base timer channels.
pub const BT_STRIDE: usize = 0x40;
/// Simultaneous soft-start register.
pub const BTSSSR: usize = 0x4002_5FFC;
pub const BASE_TIMER_COUNT: usize = 8;

pub const WC_BASE: usize = 0x4003_A000;
pub const SUB_CLOCK_HZ: u32 = 32_768;

/// Dispatcher source of base timer ch.0; ch.n is `BASE_TIMER_SOURCE + n`.
pub const BASE_TIMER_SOURCE: IrqNumber = 0;
pub const WATCH_SOURCE: IrqNumber = BASE_TIMER_SOURCE + BASE_TIMER_COUNT as IrqNumber;
/// Dispatcher table size covering every timer source.
pub const SOURCE_COUNT: usize = WATCH_SOURCE as usize + 1;

/// Base timer count clock prescalers (TMCR2.CKS3:TMCR.CKS).
pub const BASE_TIMER_DIVIDERS: &[Divider] = &[
    Divider::new(1, 0b0000),
    Divider::new(4, 0b0001),
    Divider::new(16, 0b0010),
    Divider::new(128, 0b0011),
    Divider::new(256, 0b0100),
    Divider::new(512, 0b1000),
    Divider::new(1024, 0b1001),
    Divider::new(2048, 0b1010),
];

/// Watch counter prescalers (WCCR.CS).
pub const WATCH_DIVIDERS: &[Divider] = &[
    Divider::new(4096, 0b11),
    Divider::new(8192, 0b10),
    Divider::new(16384, 0b01),
    Divider::new(32768, 0b00),
];

pub const WATCH_CLOCK: ClockDomain = ClockDomain::new(SUB_CLOCK_HZ, WATCH_DIVIDERS);

/// Base timer clocks for a peripheral bus running at `bus_hz`.
pub const fn base_timer_clock(bus_hz: u32) -> ClockDomain {
    ClockDomain::new(bus_hz, BASE_TIMER_DIVIDERS)
}

/// Timer register blocks, handed out once.
#[derive(Debug)]
pub struct Peripherals {
    pub base_timers: [BaseTimer; BASE_TIMER_COUNT],
    pub watch: WatchCounter,
}

static TAKEN: AtomicBool = AtomicBool::new(false);

impl Peripherals {
    /// Take the timer peripherals. Returns `None` after the first call.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }
        // SAFETY: first and only call; the handles are unique.
        unsafe {
            Some(Self {
                base_timers: core::array::from_fn(|i| BaseTimer::new(i as u8)),
                watch: WatchCounter::new(),
            })
        }
    }
}

pub struct Fm3Platform;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        use common::arch::arm::CortexMIrq;

        use super::Platform;

        use crate::dispatch::InterruptDispatcher;

        /// Dispatcher for every FM3 timer source.
        pub type Fm3Dispatcher = InterruptDispatcher<RegisterFlag, CortexMIrq, SOURCE_COUNT>;

        impl Platform for Fm3Platform {
            type Irq = CortexMIrq;

            fn name() -> &'static str {
                "FM3 (MB9B500 series)"
            }

            fn base_timer_clock(bus_hz: u32) -> ClockDomain {
                base_timer_clock(bus_hz)
            }

            fn watch_clock() -> ClockDomain {
                WATCH_CLOCK
            }
        }
    }
}
