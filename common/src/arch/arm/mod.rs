//! ARMv7-M support.

mod primask;

pub use primask::CortexMIrq;
