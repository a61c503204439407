//! Count-clock sources.
//!
//! A timer peripheral counts a prescaled copy of one input clock. The
//! prescaler settings form a small fixed table; a [`ClockDomain`] pairs that
//! table with the input frequency so tick periods can be derived.

const NS_PER_SEC: u64 = 1_000_000_000;
pub(crate) const US_PER_SEC: u64 = 1_000_000;

/// One prescaler setting of a timer peripheral.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Divider {
    /// Input clock cycles per counter tick.
    pub ratio: u32,
    /// Value written to the peripheral's clock-select field.
    pub select: u8,
}

impl Divider {
    /// `ratio` must be nonzero; tick arithmetic divides by it.
    pub const fn new(ratio: u32, select: u8) -> Self {
        debug_assert!(ratio != 0, "divider ratio must be nonzero");
        Self { ratio, select }
    }
}

/// The clock sources available to one peripheral.
///
/// Divider tables are listed fastest (smallest ratio) first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockDomain {
    oscillator_hz: u32,
    dividers: &'static [Divider],
}

impl ClockDomain {
    /// `oscillator_hz` must be nonzero; tick periods divide by it.
    pub const fn new(oscillator_hz: u32, dividers: &'static [Divider]) -> Self {
        debug_assert!(oscillator_hz != 0, "oscillator frequency must be nonzero");
        Self {
            oscillator_hz,
            dividers,
        }
    }

    pub fn oscillator_hz(&self) -> u32 {
        self.oscillator_hz
    }

    /// Sources in table order, fastest first.
    pub fn sources(&self) -> impl Iterator<Item = ClockSource> + '_ {
        self.dividers.iter().map(|&divider| ClockSource {
            divider,
            oscillator_hz: self.oscillator_hz,
        })
    }

    /// Look up the source programmed with `select`.
    pub fn source_for_select(&self, select: u8) -> Option<ClockSource> {
        self.sources().find(|s| s.divider.select == select)
    }
}

/// A divider bound to its input frequency.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockSource {
    pub divider: Divider,
    pub oscillator_hz: u32,
}

impl ClockSource {
    pub fn select(&self) -> u8 {
        self.divider.select
    }

    /// Tick period in nanoseconds, rounded to nearest.
    pub fn tick_period_ns(&self) -> u64 {
        div_round(self.divider.ratio as u64 * NS_PER_SEC, self.oscillator_hz as u64)
    }

    /// `interval_us` expressed in units of 10^-6 input cycles.
    ///
    /// All comparisons between a requested interval and a tick count happen
    /// in this unit, which keeps them exact for any oscillator frequency.
    pub(crate) fn scaled_interval(&self, interval_us: u64) -> u64 {
        interval_us * self.oscillator_hz as u64
    }

    /// One tick in the unit of [`scaled_interval`](Self::scaled_interval).
    pub(crate) fn scaled_tick(&self) -> u64 {
        self.divider.ratio as u64 * US_PER_SEC
    }

    /// Duration of `count` ticks in nanoseconds, rounded to nearest.
    pub fn span_ns(&self, count: u32) -> u64 {
        div_round(
            count as u64 * self.divider.ratio as u64 * NS_PER_SEC,
            self.oscillator_hz as u64,
        )
    }

    /// Nearest tick count for `interval_us`; exact half ticks round down.
    pub fn ticks_for(&self, interval_us: u64) -> u64 {
        let scaled = self.scaled_interval(interval_us);
        let tick = self.scaled_tick();
        let (whole, rest) = (scaled / tick, scaled % tick);
        if rest * 2 > tick { whole + 1 } else { whole }
    }
}

pub(crate) fn div_round(n: u64, d: u64) -> u64 {
    (n + d / 2) / d
}
