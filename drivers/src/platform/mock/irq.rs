use common::sync::IrqControl;
use std::cell::Cell;

thread_local! {
    static MASKED: Cell<bool> = const { Cell::new(false) };
}

/// Per-thread model of the CPU interrupt mask.
pub struct MockIrq;

impl MockIrq {
    pub fn masked() -> bool {
        MASKED.with(Cell::get)
    }
}

impl IrqControl for MockIrq {
    type State = bool;

    fn disable() -> bool {
        MASKED.with(|m| m.replace(true))
    }

    fn restore(was_masked: bool) {
        MASKED.with(|m| m.set(was_masked));
    }
}
