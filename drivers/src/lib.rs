//! Timer and interrupt driver subsystem.
//!
//! # Module Organization
//!
//! - [`clock`], [`quantize`]: turning microsecond intervals into a clock
//!   source and a counter value
//! - [`timer`]: the [`TimerChannel`] lifecycle over one hardware timer
//! - [`dispatch`]: routing latched interrupt requests to registered hooks
//! - [`pulse`]: two-channel pulse generation with a shared clock
//! - [`debounce`]: software debounce of polled inputs
//! - [`hal`]: platform-independent register traits
//! - [`platform`]: register-level implementations
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use periph_drivers::dispatch::{Hook, InterruptDispatcher};
//! use periph_drivers::platform::fm3::{self, Fm3Dispatcher, Peripherals};
//! use periph_drivers::quantize::{CounterWidth, TimerRequest};
//! use periph_drivers::timer::{ChannelId, TimerChannel};
//! use periph_drivers::TimerMode;
//!
//! static DISPATCHER: Fm3Dispatcher = InterruptDispatcher::new();
//!
//! let p = Peripherals::take().ok_or("taken")?;
//! let [bt0, ..] = p.base_timers;
//! let mut tick = TimerChannel::new(ChannelId(0), bt0, fm3::base_timer_clock(40_000_000), &DISPATCHER)?;
//! tick.configure(TimerRequest::new(50_000, CounterWidth::Bits16), TimerMode::Periodic, Some(Hook::new(on_tick)))?;
//! tick.start()?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod hal;
pub mod platform;
pub mod pulse;
pub mod quantize;
pub mod timer;

// Re-export commonly used types
pub use clock::{ClockDomain, ClockSource, Divider};
pub use debounce::{DebounceEvent, DebounceFilter, Edge};
pub use dispatch::{Dispatch, Hook, InterruptDispatcher};
pub use error::{ChannelError, DispatchError, PulseError, QuantizationError};
pub use hal::gpio::{InputPin, PinLevel};
pub use hal::interrupt::{AckOrder, IrqNumber, RequestFlag};
pub use hal::pulse::{PulseChannel, PulseChannelPair, PulseOutput};
pub use hal::timer::{TimerHardware, TimerMode, Trigger};
pub use pulse::{PulseGenerator, PulseSetting};
pub use quantize::{CounterWidth, QuantizedConfig, TimerRequest, quantize};
pub use timer::{ChannelId, ChannelState, TimerChannel};
