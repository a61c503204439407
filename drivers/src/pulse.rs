//! Programmable pulse generation.
//!
//! A [`PulseGenerator`] drives two pulse outputs from one prescaler. Both
//! entry points reduce to a mark/space pair in microseconds:
//!
//! - [`pulse_by_period`](PulseGenerator::pulse_by_period) takes mark and
//!   space directly
//! - [`pulse_by_frequency`](PulseGenerator::pulse_by_frequency) derives them
//!   from a frequency and a duty numerator over [`DUTY_DENOMINATOR`]
//!
//! The full period picks the divider and the count. The mark is rounded on
//! that divider and the space is the rest of the period, so the programmed
//! widths always add up to the quantized period. While either output runs,
//! the divider is pinned and the other output must fit on it.

use common::sync::{IrqControl, without_interrupts};

use crate::clock::{ClockDomain, ClockSource, US_PER_SEC};
use crate::error::{PulseError, QuantizationError};
use crate::hal::pulse::{PulseChannel, PulseChannelPair, PulseOutput};
use crate::quantize::{CounterWidth, QuantizedConfig, TimerRequest, period_us, quantize, quantize_on};

/// Duty cycle resolution: duty is `numerator / DUTY_DENOMINATOR`.
pub const DUTY_DENOMINATOR: u16 = 256;

const PAIR_WIDTH: CounterWidth = CounterWidth::Bits16;

/// What one output was programmed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PulseSetting {
    /// Quantized full period (mark + space).
    pub period: QuantizedConfig,
    pub mark_ticks: u16,
    pub space_ticks: u16,
}

impl PulseSetting {
    pub fn mark_ns(&self) -> u64 {
        self.period.source.span_ns(self.mark_ticks as u32)
    }

    pub fn space_ns(&self) -> u64 {
        self.period.source.span_ns(self.space_ticks as u32)
    }

    pub fn output(&self) -> PulseOutput {
        match (self.mark_ticks, self.space_ticks) {
            (0, _) => PulseOutput::Constant(false),
            (_, 0) => PulseOutput::Constant(true),
            (mark, space) => PulseOutput::Pulsed { mark, space },
        }
    }
}

/// Owner of one pulse pair.
pub struct PulseGenerator<P: PulseChannelPair, I: IrqControl> {
    hardware: P,
    clock: ClockDomain,
    settings: [Option<PulseSetting>; 2],
    _irq: core::marker::PhantomData<fn() -> I>,
}

impl<P: PulseChannelPair, I: IrqControl> PulseGenerator<P, I> {
    pub fn new(mut hardware: P, clock: ClockDomain) -> Self {
        without_interrupts::<I, _>(|| {
            for ch in PulseChannel::ALL {
                hardware.stop(ch);
            }
        });
        Self {
            hardware,
            clock,
            settings: [None; 2],
            _irq: core::marker::PhantomData,
        }
    }

    pub fn hardware(&self) -> &P {
        &self.hardware
    }

    /// Current setting of `channel`, if it is enabled.
    pub fn setting(&self, channel: PulseChannel) -> Option<&PulseSetting> {
        self.settings[channel.index()].as_ref()
    }

    /// The divider both outputs are pinned to, while either is enabled.
    pub fn shared_source(&self) -> Option<ClockSource> {
        self.settings.iter().flatten().next().map(|s| s.period.source)
    }

    /// Output `mark_us` high then `space_us` low, repeatedly, on `channel`.
    ///
    /// # Errors
    ///
    /// - [`PulseError::Quantization`] if the period cannot be represented
    ///   on any divider, or if a nonzero mark or space rounds to zero ticks
    /// - [`PulseError::CounterOverflow`] if the other output has pinned the
    ///   divider and mark plus space overflow the counter on it
    ///
    /// The output is unchanged on error.
    pub fn pulse_by_period(
        &mut self,
        channel: PulseChannel,
        mark_us: u32,
        space_us: u32,
    ) -> Result<PulseSetting, PulseError> {
        let total = mark_us
            .checked_add(space_us)
            .ok_or(PulseError::Quantization(QuantizationError::OutOfRange))?;
        let request = TimerRequest::new(total, PAIR_WIDTH);

        // reprogramming a channel may move the divider only if it is alone
        let pinned = self.settings[channel.other().index()].map(|s| s.period.source);
        let period = match pinned {
            Some(source) => quantize_on(source, request).map_err(|err| match err {
                QuantizationError::OutOfRange => PulseError::CounterOverflow,
                err => PulseError::Quantization(err),
            })?,
            None => quantize(&self.clock, request)?,
        };

        let mark = period
            .source
            .ticks_for(mark_us as u64)
            .min(period.count as u64) as u32;
        let space = period.count - mark;
        if (mark_us > 0 && mark == 0) || (space_us > 0 && space == 0) {
            return Err(PulseError::Quantization(
                QuantizationError::SubTickResolution,
            ));
        }

        // count fits PAIR_WIDTH
        let setting = PulseSetting {
            period,
            mark_ticks: mark as u16,
            space_ticks: space as u16,
        };

        let select = period.source.select();
        let hardware = &mut self.hardware;
        without_interrupts::<I, _>(|| {
            hardware.stop(channel);
            if pinned.is_none() {
                hardware.set_clock(select);
            }
            hardware.write_output(channel, setting.output());
            hardware.start(&[channel]);
        });

        log::debug!(
            "ppg {:?}: mark {}us space {}us -> /{} {}+{} ticks",
            channel,
            mark_us,
            space_us,
            period.source.divider.ratio,
            setting.mark_ticks,
            setting.space_ticks
        );

        self.settings[channel.index()] = Some(setting);
        Ok(setting)
    }

    /// Output `frequency_hz` with `duty / DUTY_DENOMINATOR` high time.
    ///
    /// The period is rounded to whole microseconds, the mark to the nearest
    /// microsecond of `period * duty / DUTY_DENOMINATOR`, and the space is
    /// the remainder.
    ///
    /// # Errors
    ///
    /// - [`PulseError::DutyOutOfRange`] if `duty >= DUTY_DENOMINATOR`
    /// - [`PulseError::InvalidFrequency`] if `frequency_hz` is zero or above
    ///   1 MHz
    /// - anything [`pulse_by_period`](Self::pulse_by_period) returns
    pub fn pulse_by_frequency(
        &mut self,
        channel: PulseChannel,
        frequency_hz: u32,
        duty: u16,
    ) -> Result<PulseSetting, PulseError> {
        let (mark_us, space_us) = split_period(frequency_hz, duty)?;
        self.pulse_by_period(channel, mark_us, space_us)
    }

    /// Stop `channel` and drive it low. When both outputs are stopped the
    /// divider is released.
    pub fn disable(&mut self, channel: PulseChannel) {
        let hardware = &mut self.hardware;
        without_interrupts::<I, _>(|| hardware.stop(channel));
        self.settings[channel.index()] = None;
        log::debug!("ppg {:?}: disabled", channel);
    }
}

/// Mark and space in microseconds for a frequency and duty numerator.
pub fn split_period(frequency_hz: u32, duty: u16) -> Result<(u32, u32), PulseError> {
    if duty >= DUTY_DENOMINATOR {
        return Err(PulseError::DutyOutOfRange);
    }
    if frequency_hz == 0 || frequency_hz as u64 > US_PER_SEC {
        return Err(PulseError::InvalidFrequency);
    }
    let period = period_us(frequency_hz);

    let denominator = DUTY_DENOMINATOR as u64;
    let mark = (period * duty as u64 + denominator / 2) / denominator;
    // period <= 1_000_000 here
    Ok((mark as u32, (period - mark) as u32))
}
