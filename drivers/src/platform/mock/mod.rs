//! Host-side register models for unit tests.
//!
//! Each model records what a real peripheral would have been told, and how
//! many of those writes happened with interrupts unmasked.

mod irq;
mod pin;
mod pulse;
mod timer;

pub use irq::MockIrq;
pub use pin::MockPin;
pub use pulse::MockPulsePair;
pub use timer::{MockFlag, MockRegisters, MockTimer};
