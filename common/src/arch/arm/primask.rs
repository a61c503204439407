use core::sync::atomic::{Ordering, compiler_fence};

use crate::sync::irq::IrqControl;

const PRIMASK_PM: u32 = 1;

/// Interrupt control for ARMv7-M cores through PRIMASK.
///
/// # State Management
/// The `State` type is `bool`: whether interrupts were enabled before
/// `disable()` ran. `restore(true)` re-enables them; `restore(false)` leaves
/// them masked, which keeps nested sections correct.
///
/// # Assembly Details
///
/// - `mrs {0}, PRIMASK`: read the current mask
/// - `cpsid i`: set PRIMASK (mask configurable-priority interrupts)
/// - `cpsie i`: clear PRIMASK
pub struct CortexMIrq;

impl IrqControl for CortexMIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let primask: u32;
        unsafe {
            core::arch::asm!(
                "mrs {0}, PRIMASK",
                "cpsid i",
                out(reg) primask,
                options(nomem, nostack, preserves_flags)
            );
        }
        // keep the section's accesses after the mask
        compiler_fence(Ordering::SeqCst);
        primask & PRIMASK_PM == 0
    }

    #[inline(always)]
    fn restore(prev_enabled: bool) {
        compiler_fence(Ordering::SeqCst);
        if prev_enabled {
            unsafe {
                core::arch::asm!("cpsie i", options(nomem, nostack, preserves_flags));
            }
        }
    }
}
