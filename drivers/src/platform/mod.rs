//! Platform Abstraction Layer
//!
//! Register-level drivers for one MCU family implement the traits in
//! [`crate::hal`]. The platform is chosen at build time through a Cargo
//! feature; host unit tests use [`mock`] instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use periph_drivers::platform::{CurrentPlatform, Platform};
//!
//! let clock = CurrentPlatform::base_timer_clock(40_000_000);
//! ```

use common::sync::IrqControl;

use crate::clock::ClockDomain;

/// Platform trait - implemented by each supported platform
pub trait Platform {
    /// Interrupt masking primitive of the CPU core.
    type Irq: IrqControl;

    /// Platform name for debugging
    fn name() -> &'static str;

    /// Clock sources of the general purpose timers, given the peripheral
    /// bus frequency the board runs at.
    fn base_timer_clock(bus_hz: u32) -> ClockDomain;

    /// Clock sources of the low-power wake-up counter.
    fn watch_clock() -> ClockDomain;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "fm3")] {
        pub mod fm3;
        pub use fm3::Fm3Platform as CurrentPlatform;
    } else if #[cfg(not(test))] {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features fm3"
        );
    }
}

#[cfg(test)]
pub mod mock;
