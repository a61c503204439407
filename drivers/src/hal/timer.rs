//! Timer Hardware Abstraction Layer.
//!
//! Register-level access to one down-counting timer. The
//! [`TimerChannel`](crate::timer::TimerChannel) state machine decides when
//! each of these is called; implementations only touch registers.

use super::interrupt::{AckOrder, IrqNumber, RequestFlag};
use crate::quantize::CounterWidth;

/// Timer operating mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerMode {
    /// Timer fires once after the specified interval.
    OneShot,
    /// Timer automatically reloads and fires periodically.
    Periodic,
}

/// How a timer begins (and restarts) counting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A software trigger loads the reload value and starts the count.
    Software,
    /// Counting starts when enabled and cannot be restarted mid-interval.
    Continuous,
}

/// One hardware down counter with an underflow interrupt.
pub trait TimerHardware {
    /// Request flag handed to the interrupt dispatcher.
    type Flag: RequestFlag;

    /// Native counter width.
    fn counter_width(&self) -> CounterWidth;

    fn trigger(&self) -> Trigger;

    /// Dispatcher source number of the underflow request.
    fn source(&self) -> IrqNumber;

    fn ack_order(&self) -> AckOrder;

    fn request_flag(&self) -> Self::Flag;

    /// Write clock select, reload for `count` ticks and mode.
    ///
    /// Called with counting stopped. `count` is at least one and fits
    /// [`counter_width`](Self::counter_width).
    fn program(&mut self, select: u8, count: u32, mode: TimerMode);

    /// Clear a stale underflow request.
    fn clear_request(&mut self);

    fn set_interrupt(&mut self, enabled: bool);

    fn set_counting(&mut self, enabled: bool);

    /// Issue a software trigger. Only called for [`Trigger::Software`].
    fn software_trigger(&mut self);

    /// Current counter value.
    fn count(&self) -> u32;
}
