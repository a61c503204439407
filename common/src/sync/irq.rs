use core::fmt::Debug;

/// Architecture-specific interrupt masking interface.
///
/// The drivers are generic over this trait so that the same register
/// sequences run on the target (PRIMASK) and on the host under test.
pub trait IrqControl {
    /// Saved interrupt state
    type State: Copy + Debug;

    /// Disable interrupts and return the previous state.
    fn disable() -> Self::State;

    /// Restore interrupts to a previous state.
    fn restore(state: Self::State);
}

/// Run `f` with interrupts masked.
///
/// The previous mask state is restored afterwards, so nesting a masked
/// section inside another one leaves interrupts masked until the outermost
/// section ends.
#[inline]
pub fn without_interrupts<I: IrqControl, R>(f: impl FnOnce() -> R) -> R {
    let state = I::disable();
    let result = f();
    I::restore(state);
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static MASKED: Cell<bool> = const { Cell::new(false) };
    }

    /// Thread-local stand-in for the CPU mask bit.
    pub(crate) struct TestIrq;

    impl TestIrq {
        pub(crate) fn masked() -> bool {
            MASKED.with(Cell::get)
        }
    }

    impl IrqControl for TestIrq {
        type State = bool;

        fn disable() -> bool {
            MASKED.with(|m| m.replace(true))
        }

        fn restore(was_masked: bool) {
            MASKED.with(|m| m.set(was_masked));
        }
    }

    #[test]
    fn masks_for_the_duration_of_the_closure() {
        assert!(!TestIrq::masked());
        let seen = without_interrupts::<TestIrq, _>(TestIrq::masked);
        assert!(seen);
        assert!(!TestIrq::masked());
    }

    #[test]
    fn nested_sections_keep_the_outer_mask() {
        without_interrupts::<TestIrq, _>(|| {
            without_interrupts::<TestIrq, _>(|| assert!(TestIrq::masked()));
            assert!(TestIrq::masked());
        });
        assert!(!TestIrq::masked());
    }
}
