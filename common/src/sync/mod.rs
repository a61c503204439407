pub mod irq;
pub mod irq_spinlock;

pub use irq::{IrqControl, without_interrupts};
pub use irq_spinlock::{IrqSpinLock, IrqSpinLockGuard};
