//! Interrupt masking primitives shared by the peripheral drivers.
//!
//! - [`sync`]: the [`IrqControl`](sync::IrqControl) hook, masked sections and
//!   the IRQ-safe lock used for state shared with interrupt handlers
//! - [`arch`]: architecture implementations of `IrqControl`

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
