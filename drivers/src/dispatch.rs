//! Interrupt Dispatch
//!
//! Maps interrupt sources to registered hooks. Called from the vector
//! handlers of the firmware image:
//!
//! ```rust,ignore
//! static DISPATCHER: InterruptDispatcher<RegisterFlag, CortexMIrq, 8> =
//!     InterruptDispatcher::new();
//!
//! #[unsafe(no_mangle)]
//! extern "C" fn BT0_7_IRQHandler() {
//!     DISPATCHER.dispatch_pending();
//! }
//! ```
//!
//! # Process
//! 1. Look up the source's slot (flag, acknowledge order, hook, mode)
//! 2. Clear the latched flag before or after the hook, per source
//! 3. Invoke the hook exactly once
//! 4. For one-shot sources, disarm the source after the first delivery
//!
//! A source whose request is disabled (a stopped or never started channel)
//! is not delivered: [`dispatch`](InterruptDispatcher::dispatch) only clears
//! its flag, and [`dispatch_pending`](InterruptDispatcher::dispatch_pending)
//! skips it.
//!
//! There is no queue. A request that latches again before its hook returns
//! is either delivered once more (clear-before-invoke) or dropped
//! (clear-after-invoke); hooks must finish within one interval.

use common::sync::{IrqControl, IrqSpinLock};

use crate::error::DispatchError;
use crate::hal::interrupt::{AckOrder, IrqNumber, RequestFlag};
use crate::hal::timer::TimerMode;

/// Interrupt callback.
///
/// Hooks run in interrupt context. Only plain `fn()` items are accepted: a
/// function pointer carries no captured state, so it cannot own heap data or
/// hold a lock guard across the call. Hooks must not dispatch their own
/// source.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Hook(fn());

impl Hook {
    pub const fn new(f: fn()) -> Self {
        Self(f)
    }

    #[inline]
    pub fn call(self) {
        (self.0)()
    }
}

impl core::fmt::Debug for Hook {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Hook({:p})", self.0 as *const ())
    }
}

/// Result of one dispatch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The hook ran.
    Invoked,
    /// The flag was cleared; no hook was registered, the source is disabled
    /// or the one-shot was spent.
    Cleared,
    /// No peripheral is bound to the source.
    Unbound,
}

#[derive(Copy, Clone)]
struct Binding<F> {
    flag: F,
    order: AckOrder,
}

#[derive(Copy, Clone)]
struct Slot<F> {
    binding: Option<Binding<F>>,
    hook: Option<Hook>,
    mode: TimerMode,
    spent: bool,
}

impl<F> Slot<F> {
    const EMPTY: Self = Self {
        binding: None,
        hook: None,
        mode: TimerMode::Periodic,
        spent: false,
    };
}

/// Table of `N` interrupt sources.
///
/// Slots are bound once by the channel that owns the peripheral; hooks can be
/// replaced at any time from the foreground. Last registration wins.
pub struct InterruptDispatcher<F: RequestFlag, I: IrqControl, const N: usize> {
    slots: [IrqSpinLock<Slot<F>, I>; N],
}

impl<F: RequestFlag, I: IrqControl, const N: usize> InterruptDispatcher<F, I, N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { IrqSpinLock::new(Slot::EMPTY) }; N],
        }
    }

    fn slot(&self, source: IrqNumber) -> Result<&IrqSpinLock<Slot<F>, I>, DispatchError> {
        self.slots
            .get(source as usize)
            .ok_or(DispatchError::SourceOutOfRange)
    }

    /// Attach a peripheral's request flag to `source`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::SourceBusy`] if another peripheral already owns the
    /// source.
    pub fn bind(&self, source: IrqNumber, flag: F, order: AckOrder) -> Result<(), DispatchError> {
        let mut slot = self.slot(source)?.lock();
        if slot.binding.is_some() {
            return Err(DispatchError::SourceBusy);
        }
        slot.binding = Some(Binding { flag, order });
        Ok(())
    }

    /// Register `hook` for `source`, dropping any previous hook.
    ///
    /// Foreground only; never from the source's own hook.
    pub fn register(&self, source: IrqNumber, hook: Hook) -> Result<(), DispatchError> {
        self.slot(source)?.with(|slot| slot.hook = Some(hook));
        Ok(())
    }

    /// Remove the hook for `source`. Requests are still cleared.
    pub fn unregister(&self, source: IrqNumber) -> Result<(), DispatchError> {
        self.slot(source)?.with(|slot| slot.hook = None);
        Ok(())
    }

    /// Reset delivery for a (re)started source.
    pub(crate) fn arm(&self, source: IrqNumber, mode: TimerMode) -> Result<(), DispatchError> {
        self.slot(source)?.with(|slot| {
            slot.mode = mode;
            slot.spent = false;
        });
        Ok(())
    }

    /// Whether a hook is currently registered for `source`.
    pub fn is_registered(&self, source: IrqNumber) -> bool {
        self.slot(source)
            .map(|slot| slot.with(|s| s.hook.is_some()))
            .unwrap_or(false)
    }

    /// Handle one request from `source`.
    pub fn dispatch(&self, source: IrqNumber) -> Dispatch {
        let Ok(slot) = self.slot(source) else {
            log::warn!("Unhandled IRQ source: {}", source);
            return Dispatch::Unbound;
        };

        // Decide under the lock, call the hook outside it.
        let (binding, hook, one_shot) = {
            let mut slot = slot.lock();
            let Some(binding) = slot.binding else {
                drop(slot);
                log::warn!("Unhandled IRQ source: {}", source);
                return Dispatch::Unbound;
            };
            let enabled = binding.flag.is_enabled();
            let hook = if slot.spent || !enabled { None } else { slot.hook };
            let one_shot = enabled && slot.mode == TimerMode::OneShot;
            slot.spent |= one_shot;
            (binding, hook, one_shot)
        };

        let outcome = match (hook, binding.order) {
            (None, _) => {
                binding.flag.clear();
                Dispatch::Cleared
            }
            (Some(hook), AckOrder::ClearBeforeInvoke) => {
                binding.flag.clear();
                hook.call();
                Dispatch::Invoked
            }
            (Some(hook), AckOrder::ClearAfterInvoke) => {
                hook.call();
                binding.flag.clear();
                Dispatch::Invoked
            }
        };

        if one_shot {
            binding.flag.disarm();
        }
        outcome
    }

    /// Dispatch every bound, enabled source whose request is latched.
    ///
    /// For vectors shared by several peripherals. Returns the number of
    /// sources handled.
    pub fn dispatch_pending(&self) -> usize {
        let mut handled = 0;
        for source in 0..N {
            let pending = self.slots[source]
                .with(|slot| {
                    slot.binding
                        .is_some_and(|b| b.flag.is_enabled() && b.flag.is_pending())
                });
            if pending {
                self.dispatch(source as IrqNumber);
                handled += 1;
            }
        }
        handled
    }
}

impl<F: RequestFlag, I: IrqControl, const N: usize> Default for InterruptDispatcher<F, I, N> {
    fn default() -> Self {
        Self::new()
    }
}
