use crate::hal::gpio::{InputPin, PinLevel};
use std::cell::Cell;

/// Input pin whose level the test sets.
#[derive(Debug, Default)]
pub struct MockPin {
    high: Cell<bool>,
}

impl MockPin {
    pub fn set(&self, high: bool) {
        self.high.set(high);
    }
}

impl InputPin for MockPin {
    type Error = core::convert::Infallible;

    fn read(&self) -> Result<PinLevel, Self::Error> {
        Ok(self.high.get().into())
    }
}
