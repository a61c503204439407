use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::MockIrq;
use crate::hal::interrupt::{AckOrder, IrqNumber, RequestFlag};
use crate::hal::timer::{TimerHardware, TimerMode, Trigger};
use crate::quantize::CounterWidth;

/// Register state of one mock timer.
#[derive(Debug, Default)]
pub struct MockRegisters {
    pending: AtomicBool,
    irq_enabled: AtomicBool,
    counting: AtomicBool,
    one_shot: AtomicBool,
    select: AtomicU8,
    reload_count: AtomicU32,
    triggers: AtomicU32,
    writes: AtomicU32,
    unmasked_writes: AtomicU32,
}

impl MockRegisters {
    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        if !MockIrq::masked() {
            self.unmasked_writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Latch an underflow request, as the counter would.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Relaxed);
    }

    pub fn pending(&self) -> bool {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn set_interrupt_enabled(&self, enabled: bool) {
        self.irq_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.irq_enabled.load(Ordering::Relaxed)
    }

    pub fn counting(&self) -> bool {
        self.counting.load(Ordering::Relaxed)
    }

    pub fn one_shot(&self) -> bool {
        self.one_shot.load(Ordering::Relaxed)
    }

    pub fn select(&self) -> u8 {
        self.select.load(Ordering::Relaxed)
    }

    pub fn reload_count(&self) -> u32 {
        self.reload_count.load(Ordering::Relaxed)
    }

    pub fn triggers(&self) -> u32 {
        self.triggers.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn unmasked_writes(&self) -> u32 {
        self.unmasked_writes.load(Ordering::Relaxed)
    }
}

/// Request flag view of [`MockRegisters`].
#[derive(Debug, Copy, Clone)]
pub struct MockFlag {
    regs: &'static MockRegisters,
}

impl RequestFlag for MockFlag {
    fn is_pending(&self) -> bool {
        self.regs.pending()
    }

    fn is_enabled(&self) -> bool {
        self.regs.interrupt_enabled()
    }

    fn clear(&self) {
        self.regs.pending.store(false, Ordering::Relaxed);
    }

    fn disarm(&self) {
        self.regs.set_interrupt_enabled(false);
    }
}

/// Timer register model. The registers are leaked so that flags can outlive
/// the handle, like memory-mapped registers do.
#[derive(Debug)]
pub struct MockTimer {
    regs: &'static MockRegisters,
    source: IrqNumber,
    order: AckOrder,
    width: CounterWidth,
    trigger: Trigger,
}

impl MockTimer {
    pub fn new(source: IrqNumber, order: AckOrder) -> Self {
        Self {
            regs: Box::leak(Box::default()),
            source,
            order,
            width: CounterWidth::Bits16,
            trigger: Trigger::Software,
        }
    }

    pub fn with_width(mut self, width: CounterWidth) -> Self {
        self.width = width;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn registers(&self) -> &'static MockRegisters {
        self.regs
    }
}

impl TimerHardware for MockTimer {
    type Flag = MockFlag;

    fn counter_width(&self) -> CounterWidth {
        self.width
    }

    fn trigger(&self) -> Trigger {
        self.trigger
    }

    fn source(&self) -> IrqNumber {
        self.source
    }

    fn ack_order(&self) -> AckOrder {
        self.order
    }

    fn request_flag(&self) -> MockFlag {
        MockFlag { regs: self.regs }
    }

    fn program(&mut self, select: u8, count: u32, mode: TimerMode) {
        self.regs.record_write();
        self.regs.select.store(select, Ordering::Relaxed);
        self.regs.reload_count.store(count, Ordering::Relaxed);
        self.regs
            .one_shot
            .store(mode == TimerMode::OneShot, Ordering::Relaxed);
    }

    fn clear_request(&mut self) {
        self.regs.record_write();
        self.regs.pending.store(false, Ordering::Relaxed);
    }

    fn set_interrupt(&mut self, enabled: bool) {
        self.regs.record_write();
        self.regs.set_interrupt_enabled(enabled);
    }

    fn set_counting(&mut self, enabled: bool) {
        self.regs.record_write();
        self.regs.counting.store(enabled, Ordering::Relaxed);
    }

    fn software_trigger(&mut self) {
        self.regs.record_write();
        self.regs.triggers.fetch_add(1, Ordering::Relaxed);
    }

    fn count(&self) -> u32 {
        self.regs.reload_count()
    }
}
