//! Interrupt request flags.

/// Interrupt source number, an index into a dispatcher table.
///
/// This identifies a peripheral request, not an NVIC line: several sources
/// may share one vector.
pub type IrqNumber = u32;

/// When the dispatcher clears a latched request relative to the hook call.
///
/// Each register driver declares its order and documents why.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AckOrder {
    /// Clear first; a request latched while the hook runs stays pending and
    /// is delivered again.
    ClearBeforeInvoke,
    /// Clear after the hook returns; the hook still sees the flag set.
    ClearAfterInvoke,
}

/// A peripheral's latched interrupt request bit.
///
/// Implementations are small copyable views of one status register. They are
/// only handed out by the driver that owns the peripheral.
pub trait RequestFlag: Copy {
    /// Check whether the request is latched.
    fn is_pending(&self) -> bool;

    /// Check whether the request is enabled to reach the CPU.
    fn is_enabled(&self) -> bool;

    /// Clear the latched request.
    fn clear(&self);

    /// Disable the request from reaching the CPU.
    ///
    /// Used to end a one-shot source after its single delivery.
    fn disarm(&self);
}
