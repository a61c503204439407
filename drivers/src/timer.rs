//! Timer channels.
//!
//! A [`TimerChannel`] exclusively owns one hardware timer and walks it
//! through `Idle → Armed → Running → Stopped → Armed → …`:
//!
//! | operation     | from              | to      |
//! |---------------|-------------------|---------|
//! | `configure`   | Idle, Stopped     | Armed   |
//! | `start`       | Armed             | Running |
//! | `stop`        | Armed, Running    | Stopped |
//! | `stop`        | Stopped           | (no-op) |
//! | `retrigger`   | Running           | Running |
//!
//! Every other pair fails with [`ChannelError::InvalidState`] and changes
//! nothing. Register sequences run with interrupts masked so the channel's
//! own handler never sees a half-written divider and reload.

use common::sync::{IrqControl, without_interrupts};

use crate::clock::ClockDomain;
use crate::dispatch::{Hook, InterruptDispatcher};
use crate::error::ChannelError;
use crate::hal::timer::{TimerHardware, TimerMode, Trigger};
use crate::quantize::{QuantizedConfig, TimerRequest, quantize};

/// Channel identifier, for logs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelId(pub u8);

/// Lifecycle state of a channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelState {
    /// Never configured.
    Idle,
    /// Configured, not counting.
    Armed,
    /// Counting.
    Running,
    /// Halted; configuration retained.
    Stopped,
}

/// One hardware timer and its interrupt slot.
pub struct TimerChannel<'d, H, I, const N: usize>
where
    H: TimerHardware,
    I: IrqControl,
{
    id: ChannelId,
    hardware: H,
    clock: ClockDomain,
    dispatcher: &'d InterruptDispatcher<H::Flag, I, N>,
    state: ChannelState,
    config: Option<QuantizedConfig>,
    mode: TimerMode,
    hook: Option<Hook>,
}

impl<'d, H, I, const N: usize> TimerChannel<'d, H, I, N>
where
    H: TimerHardware,
    I: IrqControl,
{
    /// Take ownership of `hardware` and bind its interrupt source.
    ///
    /// # Errors
    ///
    /// Fails if the source is outside the dispatcher or already bound to
    /// another channel.
    pub fn new(
        id: ChannelId,
        mut hardware: H,
        clock: ClockDomain,
        dispatcher: &'d InterruptDispatcher<H::Flag, I, N>,
    ) -> Result<Self, ChannelError> {
        dispatcher.bind(hardware.source(), hardware.request_flag(), hardware.ack_order())?;
        without_interrupts::<I, _>(|| {
            hardware.set_interrupt(false);
            hardware.set_counting(false);
        });

        Ok(Self {
            id,
            hardware,
            clock,
            dispatcher,
            state: ChannelState::Idle,
            config: None,
            mode: TimerMode::Periodic,
            hook: None,
        })
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn config(&self) -> Option<&QuantizedConfig> {
        self.config.as_ref()
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn hook(&self) -> Option<Hook> {
        self.hook
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Live counter value.
    pub fn count(&self) -> u32 {
        self.hardware.count()
    }

    /// Quantize `request` and store it with `mode` and `hook`.
    ///
    /// Nothing is written to the timer until [`start`](Self::start). On error
    /// the channel keeps its previous state, configuration and hook.
    pub fn configure(
        &mut self,
        request: TimerRequest,
        mode: TimerMode,
        hook: Option<Hook>,
    ) -> Result<&QuantizedConfig, ChannelError> {
        if !matches!(self.state, ChannelState::Idle | ChannelState::Stopped) {
            return Err(ChannelError::InvalidState);
        }
        if request.counter_width > self.hardware.counter_width() {
            return Err(ChannelError::UnsupportedWidth);
        }

        let config = quantize(&self.clock, request)?;

        let source = self.hardware.source();
        match hook {
            Some(hook) => self.dispatcher.register(source, hook)?,
            None => self.dispatcher.unregister(source)?,
        }

        log::debug!(
            "timer {}: {}us -> /{} x {} ({:?})",
            self.id.0,
            request.interval_us,
            config.source.divider.ratio,
            config.count,
            mode
        );

        self.hook = hook;
        self.mode = mode;
        self.state = ChannelState::Armed;
        Ok(self.config.insert(config))
    }

    /// Program the timer and start counting.
    pub fn start(&mut self) -> Result<(), ChannelError> {
        if self.state != ChannelState::Armed {
            return Err(ChannelError::InvalidState);
        }
        let config = self.config.ok_or(ChannelError::InvalidState)?;

        self.dispatcher.arm(self.hardware.source(), self.mode)?;

        let mode = self.mode;
        let hardware = &mut self.hardware;
        without_interrupts::<I, _>(|| {
            hardware.program(config.source.select(), config.count, mode);
            hardware.clear_request();
            hardware.set_interrupt(true);
            hardware.set_counting(true);
            if hardware.trigger() == Trigger::Software {
                hardware.software_trigger();
            }
        });

        log::debug!("timer {}: started", self.id.0);
        self.state = ChannelState::Running;
        Ok(())
    }

    /// Stop counting, mask the interrupt and drop a request that latched
    /// before the stop. Stopping a stopped channel is a no-op.
    pub fn stop(&mut self) -> Result<(), ChannelError> {
        match self.state {
            ChannelState::Stopped => return Ok(()),
            ChannelState::Idle => return Err(ChannelError::InvalidState),
            ChannelState::Armed | ChannelState::Running => {}
        }

        let hardware = &mut self.hardware;
        without_interrupts::<I, _>(|| {
            hardware.set_interrupt(false);
            hardware.set_counting(false);
            hardware.clear_request();
        });

        log::debug!("timer {}: stopped", self.id.0);
        self.state = ChannelState::Stopped;
        Ok(())
    }

    /// Restart the running count from the full interval.
    ///
    /// Only for timers with a software trigger.
    pub fn retrigger(&mut self) -> Result<(), ChannelError> {
        if self.state != ChannelState::Running || self.hardware.trigger() != Trigger::Software {
            return Err(ChannelError::InvalidState);
        }

        self.dispatcher.arm(self.hardware.source(), self.mode)?;

        let hardware = &mut self.hardware;
        without_interrupts::<I, _>(|| {
            // a spent one-shot was disarmed by the dispatcher
            hardware.set_interrupt(true);
            hardware.software_trigger();
        });

        log::debug!("timer {}: retriggered", self.id.0);
        Ok(())
    }
}
