//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! The core drivers ([`crate::timer`], [`crate::dispatch`],
//! [`crate::pulse`], [`crate::debounce`]) are written against these traits.
//! Register-level implementations live in [`crate::platform`].
//!
//! # Available Interfaces
//!
//! - [`timer`]: Reload/interval timer register access
//! - [`interrupt`]: Interrupt request flags and acknowledge order
//! - [`pulse`]: Paired pulse (PPG) output registers
//! - [`gpio`]: Digital input pins

pub mod gpio;
pub mod interrupt;
pub mod pulse;
pub mod timer;
