//! Interval quantization.
//!
//! Converts a requested interval into a clock source and a tick count that
//! the counter can hold, choosing the combination with the smallest timing
//! error. Pure arithmetic: nothing here touches hardware.

use crate::clock::{ClockDomain, ClockSource, US_PER_SEC, div_round};
use crate::error::QuantizationError;

/// Width of a hardware down counter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CounterWidth {
    /// Watch counter.
    Bits6,
    Bits8,
    Bits16,
}

impl CounterWidth {
    pub const fn bits(self) -> u32 {
        match self {
            CounterWidth::Bits6 => 6,
            CounterWidth::Bits8 => 8,
            CounterWidth::Bits16 => 16,
        }
    }

    /// Largest count the counter can hold.
    pub const fn max_count(self) -> u32 {
        (1 << self.bits()) - 1
    }
}

/// "Fire every `interval_us` microseconds on a counter this wide."
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimerRequest {
    pub interval_us: u32,
    pub counter_width: CounterWidth,
}

impl TimerRequest {
    pub const fn new(interval_us: u32, counter_width: CounterWidth) -> Self {
        Self {
            interval_us,
            counter_width,
        }
    }
}

/// A hardware-representable interval.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuantizedConfig {
    pub source: ClockSource,
    /// Ticks per interval, `1..=counter_width.max_count()`.
    pub count: u32,
    pub requested_us: u32,
    pub achieved_ns: u64,
    pub error_ns: u64,
}

impl QuantizedConfig {
    pub fn achieved_interval_us(&self) -> u64 {
        div_round(self.achieved_ns, 1_000)
    }

    pub fn error_us(&self) -> u64 {
        div_round(self.error_ns, 1_000)
    }

    pub fn tick_period_ns(&self) -> u64 {
        self.source.tick_period_ns()
    }
}

/// Candidate ranked by its error in scaled units.
struct Candidate {
    config: QuantizedConfig,
    scaled_error: u64,
}

fn evaluate(source: ClockSource, request: TimerRequest) -> Result<Candidate, QuantizationError> {
    let interval = request.interval_us as u64;
    let scaled = source.scaled_interval(interval);
    let tick = source.scaled_tick();

    if interval == 0 || scaled < tick {
        return Err(QuantizationError::SubTickResolution);
    }

    let count = source.ticks_for(interval);
    if count > request.counter_width.max_count() as u64 {
        return Err(QuantizationError::OutOfRange);
    }

    // count >= 1 here: scaled >= tick rounds to at least one tick
    let count = count as u32;
    let scaled_error = scaled.abs_diff(count as u64 * tick);
    let achieved_ns = source.span_ns(count);

    Ok(Candidate {
        config: QuantizedConfig {
            source,
            count,
            requested_us: request.interval_us,
            achieved_ns,
            error_ns: (interval * 1_000).abs_diff(achieved_ns),
        },
        scaled_error,
    })
}

/// Pick the clock source and count that best reproduce `request`.
///
/// Sources are tried fastest first. The smallest error wins; on equal error
/// the faster clock is kept because it gives finer duty resolution.
///
/// # Errors
///
/// - [`QuantizationError::SubTickResolution`] if the interval is shorter
///   than a tick of every source
/// - [`QuantizationError::OutOfRange`] if the interval needs more ticks than
///   the counter holds on every source
pub fn quantize(
    domain: &ClockDomain,
    request: TimerRequest,
) -> Result<QuantizedConfig, QuantizationError> {
    let mut best: Option<Candidate> = None;
    let mut failure = QuantizationError::SubTickResolution;

    for source in domain.sources() {
        match evaluate(source, request) {
            Ok(candidate) => {
                if best
                    .as_ref()
                    .is_none_or(|b| candidate.scaled_error < b.scaled_error)
                {
                    best = Some(candidate);
                }
            }
            Err(QuantizationError::OutOfRange) => failure = QuantizationError::OutOfRange,
            Err(QuantizationError::SubTickResolution) => {}
        }
    }

    let best = best.ok_or(failure)?;
    log::trace!(
        "quantized {}us: /{} x {} = {}ns",
        request.interval_us,
        best.config.source.divider.ratio,
        best.config.count,
        best.config.achieved_ns
    );
    Ok(best.config)
}

/// Quantize `request` on one fixed source.
pub fn quantize_on(
    source: ClockSource,
    request: TimerRequest,
) -> Result<QuantizedConfig, QuantizationError> {
    evaluate(source, request).map(|c| c.config)
}

/// Convert a frequency to its period in whole microseconds.
pub(crate) fn period_us(frequency_hz: u32) -> u64 {
    div_round(US_PER_SEC, frequency_hz as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Divider;

    /// 1 MHz input: tick periods of 1, 2, 4, 8, 16 and 128 us.
    static MICRO_TABLE: [Divider; 6] = [
        Divider::new(1, 0),
        Divider::new(2, 1),
        Divider::new(4, 2),
        Divider::new(8, 3),
        Divider::new(16, 4),
        Divider::new(128, 5),
    ];

    fn domain() -> ClockDomain {
        ClockDomain::new(1_000_000, &MICRO_TABLE)
    }

    fn req16(interval_us: u32) -> TimerRequest {
        TimerRequest::new(interval_us, CounterWidth::Bits16)
    }

    #[test]
    fn exact_interval_prefers_the_fastest_clock() {
        let cfg = quantize(&domain(), req16(50_000)).unwrap();
        assert_eq!(cfg.source.divider.ratio, 1);
        assert_eq!(cfg.count, 50_000);
        assert_eq!(cfg.achieved_interval_us(), 50_000);
        assert_eq!(cfg.error_us(), 0);
    }

    #[test]
    fn sixteen_microsecond_clock_needs_3125_ticks_for_50ms() {
        let source = domain().sources().nth(4).unwrap();
        let cfg = quantize_on(source, req16(50_000)).unwrap();
        assert_eq!(cfg.count, 3125);
        assert_eq!(cfg.achieved_interval_us(), 50_000);
        assert_eq!(cfg.error_ns, 0);
    }

    #[test]
    fn long_interval_falls_through_to_the_slow_clock() {
        let cfg = quantize(&domain(), req16(2_000_000)).unwrap();
        assert_eq!(cfg.source.divider.ratio, 128);
        assert_eq!(cfg.count, 15_625);
        assert_eq!(cfg.error_ns, 0);
    }

    #[test]
    fn overflow_boundary_on_the_slowest_clock() {
        // 65535.5 ticks of 128us: the tie rounds down and still fits
        let cfg = quantize(&domain(), req16(8_388_544)).unwrap();
        assert_eq!(cfg.count, 65_535);
        assert_eq!(cfg.error_us(), 64);

        assert_eq!(
            quantize(&domain(), req16(8_388_545)),
            Err(QuantizationError::OutOfRange)
        );
        assert_eq!(
            quantize(&domain(), req16(8_389_000)),
            Err(QuantizationError::OutOfRange)
        );
    }

    #[test]
    fn sub_tick_requests_are_rejected() {
        let slow = ClockDomain::new(1_000_000, &MICRO_TABLE[4..]);
        assert_eq!(
            quantize(&slow, req16(15)),
            Err(QuantizationError::SubTickResolution)
        );
        assert_eq!(
            quantize(&domain(), req16(0)),
            Err(QuantizationError::SubTickResolution)
        );
    }

    #[test]
    fn eight_bit_counter_moves_to_a_coarser_clock() {
        let cfg = quantize(&domain(), TimerRequest::new(1_000, CounterWidth::Bits8)).unwrap();
        assert_eq!(cfg.source.divider.ratio, 4);
        assert_eq!(cfg.count, 250);
    }

    #[test]
    fn smallest_error_wins_over_clock_order() {
        // 1000us at 24 MHz: /4 and /16 are exact; /128 is 187.5 ticks
        static TABLE: [Divider; 3] = [Divider::new(4, 0), Divider::new(16, 1), Divider::new(128, 2)];
        let domain = ClockDomain::new(24_000_000, &TABLE);
        let cfg = quantize(&domain, TimerRequest::new(1_000, CounterWidth::Bits16)).unwrap();
        assert_eq!(cfg.source.divider.ratio, 4);
        assert_eq!(cfg.count, 6_000);

        // 9000us on 8 bits: only /1024 fits; 210.9375 ticks -> 211
        static COARSE: [Divider; 2] = [Divider::new(128, 0), Divider::new(1024, 1)];
        let domain = ClockDomain::new(24_000_000, &COARSE);
        let cfg = quantize(&domain, TimerRequest::new(9_000, CounterWidth::Bits8)).unwrap();
        assert_eq!(cfg.source.divider.ratio, 1024);
        assert_eq!(cfg.count, 211);
        assert!(cfg.error_ns * 2 <= cfg.tick_period_ns());
    }

    #[test]
    fn error_never_exceeds_half_a_tick() {
        let domain = domain();
        for interval in (1..9_000_000u32).step_by(7_919) {
            if let Ok(cfg) = quantize(&domain, req16(interval)) {
                assert!(
                    cfg.error_ns * 2 <= cfg.tick_period_ns(),
                    "{interval}us -> {cfg:?}"
                );
                assert!(cfg.count >= 1 && cfg.count <= 65_535);
            }
        }
    }

    #[test]
    fn quantization_is_deterministic() {
        let a = quantize(&domain(), req16(123_457));
        let b = quantize(&domain(), req16(123_457));
        assert_eq!(a, b);
    }

    #[test]
    fn non_integer_tick_periods_quantize_exactly() {
        static TABLE: [Divider; 1] = [Divider::new(1, 0)];
        let domain = ClockDomain::new(40_000_000, &TABLE);
        let cfg = quantize(&domain, TimerRequest::new(1_000, CounterWidth::Bits16)).unwrap();
        assert_eq!(cfg.count, 40_000);
        assert_eq!(cfg.achieved_ns, 1_000_000);
        assert_eq!(cfg.tick_period_ns(), 25);
    }

    #[test]
    fn frequency_to_period_rounds_to_nearest() {
        assert_eq!(period_us(1_000), 1_000);
        assert_eq!(period_us(3), 333_333);
        assert_eq!(period_us(1_500_000), 1);
    }
}
