//! Interrupt request bits in 8-bit status registers.

use core::ptr::{read_volatile, write_volatile};

use crate::hal::interrupt::RequestFlag;

/// A request bit and its enable bit in one status/control byte.
///
/// FM3 request bits are cleared by writing 0 and ignore writes of 1. Every
/// write sets all such bits of the register (`w0c`) except the one being
/// cleared, so requests of neighbouring sources are never lost.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterFlag {
    addr: usize,
    request: u8,
    enable: u8,
    w0c: u8,
}

impl RegisterFlag {
    /// # Safety
    ///
    /// `addr` must be a mapped status register containing `request` and
    /// `enable`, and `w0c` must cover exactly its write-zero-to-clear bits.
    pub const unsafe fn new(addr: usize, request: u8, enable: u8, w0c: u8) -> Self {
        Self {
            addr,
            request,
            enable,
            w0c,
        }
    }

    fn read(&self) -> u8 {
        unsafe { read_volatile(self.addr as *const u8) }
    }

    fn write_masked(&self, clear: u8) {
        let value = write_value(self.read(), self.w0c, clear);
        unsafe { write_volatile(self.addr as *mut u8, value) }
    }
}

/// Value to write back so that only `clear` goes to zero.
pub(super) const fn write_value(current: u8, w0c: u8, clear: u8) -> u8 {
    (current | w0c) & !clear
}

impl RequestFlag for RegisterFlag {
    fn is_pending(&self) -> bool {
        self.read() & self.request != 0
    }

    fn is_enabled(&self) -> bool {
        self.read() & self.enable != 0
    }

    fn clear(&self) {
        self.write_masked(self.request);
    }

    fn disarm(&self) {
        self.write_masked(self.enable);
    }
}
