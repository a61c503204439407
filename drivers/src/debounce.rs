//! Software debounce for polled inputs.
//!
//! The filter is a saturating counter driven once per poll by the raw pin
//! level. It tracks one edge direction: counting while the input sits at the
//! tracked level and restarting from zero on any contrary sample. When the
//! count first reaches the threshold the input is settled and a single
//! [`DebounceEvent::Settled`] is produced. Opposite edges of one pin need two
//! filters.
//!
//! The threshold is passed on every poll so callers can change it without
//! rebuilding the filter. Changing it mid-run is not re-evaluated against
//! the current count:
//!
//! - lowered below an unsettled count, nothing fires until a contrary sample
//!   resets the count
//! - raised above a settled count, counting resumes and settles again at the
//!   new threshold
//!
//! A threshold of zero never settles.
//!
//! [`DebounceFilter::settled_level`] records the level of the last settle
//! only. A later contrary input restarts the count but leaves the level as
//! it was; track the other direction with a second filter to see it.

use crate::hal::gpio::InputPin;

/// Which level the filter waits for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    /// Settle on a sustained high.
    Rising,
    /// Settle on a sustained low.
    Falling,
}

impl Edge {
    const fn level(self) -> bool {
        matches!(self, Edge::Rising)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DebounceEvent {
    None,
    /// The input just settled at the tracked level.
    Settled,
}

/// Debounce state of one pin.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DebounceFilter {
    counter: u16,
    settled_level: bool,
}

impl DebounceFilter {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            settled_level: false,
        }
    }

    /// Level of the most recent settle, `false` before the first one.
    ///
    /// Not the current input level: contrary samples after a settle leave
    /// it unchanged.
    pub fn settled_level(&self) -> bool {
        self.settled_level
    }

    /// Consecutive matching samples seen, saturated at the threshold.
    pub fn count(&self) -> u16 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Feed one raw sample.
    pub fn poll(&mut self, edge: Edge, raw_level: bool, threshold: u16) -> DebounceEvent {
        if raw_level != edge.level() {
            self.counter = 0;
            return DebounceEvent::None;
        }
        if self.counter >= threshold {
            return DebounceEvent::None;
        }

        self.counter += 1;
        if self.counter == threshold {
            self.settled_level = edge.level();
            DebounceEvent::Settled
        } else {
            DebounceEvent::None
        }
    }

    /// Track a rising input.
    pub fn pos_trigger(&mut self, raw_level: bool, threshold: u16) -> DebounceEvent {
        self.poll(Edge::Rising, raw_level, threshold)
    }

    /// Track a falling input.
    pub fn neg_trigger(&mut self, raw_level: bool, threshold: u16) -> DebounceEvent {
        self.poll(Edge::Falling, raw_level, threshold)
    }

    /// Sample `pin` and feed the level to the filter.
    pub fn poll_pin<P: InputPin>(
        &mut self,
        pin: &P,
        edge: Edge,
        threshold: u16,
    ) -> Result<DebounceEvent, P::Error> {
        let level: bool = pin.read()?.into();
        Ok(self.poll(edge, level, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPin;

    fn feed(filter: &mut DebounceFilter, samples: &[bool], threshold: u16) -> Vec<DebounceEvent> {
        samples
            .iter()
            .map(|&s| filter.pos_trigger(s, threshold))
            .collect()
    }

    #[test]
    fn eight_highs_settle_on_the_eighth() {
        let mut filter = DebounceFilter::new();
        let events = feed(&mut filter, &[true; 8], 8);
        assert!(events[..7].iter().all(|e| *e == DebounceEvent::None));
        assert_eq!(events[7], DebounceEvent::Settled);
        assert!(filter.settled_level());

        assert_eq!(filter.pos_trigger(true, 8), DebounceEvent::None);
        assert_eq!(filter.count(), 8);
    }

    #[test]
    fn a_glitch_restarts_the_count() {
        let mut filter = DebounceFilter::new();
        let events = feed(&mut filter, &[true, true, true, false], 4);
        assert!(events.iter().all(|e| *e == DebounceEvent::None));
        assert_eq!(filter.count(), 0);

        let events = feed(&mut filter, &[true; 4], 4);
        assert_eq!(events[3], DebounceEvent::Settled);
        assert_eq!(
            events.iter().filter(|e| **e == DebounceEvent::Settled).count(),
            1
        );
    }

    #[test]
    fn settles_again_after_the_input_drops() {
        let mut filter = DebounceFilter::new();
        feed(&mut filter, &[true; 5], 3);
        assert_eq!(filter.pos_trigger(false, 3), DebounceEvent::None);
        let events = feed(&mut filter, &[true; 3], 3);
        assert_eq!(
            events,
            [DebounceEvent::None, DebounceEvent::None, DebounceEvent::Settled]
        );
    }

    #[test]
    fn falling_edge_counts_lows() {
        let mut filter = DebounceFilter::new();
        assert_eq!(filter.neg_trigger(false, 2), DebounceEvent::None);
        assert_eq!(filter.neg_trigger(true, 2), DebounceEvent::None);
        assert_eq!(filter.neg_trigger(false, 2), DebounceEvent::None);
        assert_eq!(filter.neg_trigger(false, 2), DebounceEvent::Settled);
        assert!(!filter.settled_level());
    }

    #[test]
    fn settled_level_follows_the_last_settle() {
        let mut rising = DebounceFilter::new();
        let mut falling = DebounceFilter::new();
        for level in [true, true, false, false] {
            rising.pos_trigger(level, 2);
            falling.neg_trigger(level, 2);
        }
        assert!(rising.settled_level());
        assert!(!falling.settled_level());
        assert_eq!(rising.count(), 0);
        assert_eq!(falling.count(), 2);
    }

    #[test]
    fn settled_level_ignores_a_later_contrary_input() {
        let mut filter = DebounceFilter::new();
        feed(&mut filter, &[true; 3], 3);
        feed(&mut filter, &[false; 10], 3);
        assert!(filter.settled_level());
        assert_eq!(filter.count(), 0);
    }

    #[test]
    fn lowering_the_threshold_mid_run_suppresses_the_settle() {
        let mut filter = DebounceFilter::new();
        feed(&mut filter, &[true; 5], 8);
        assert_eq!(filter.pos_trigger(true, 3), DebounceEvent::None);
        assert_eq!(filter.count(), 5);
        filter.pos_trigger(false, 3);
        assert_eq!(feed(&mut filter, &[true; 3], 3)[2], DebounceEvent::Settled);
    }

    #[test]
    fn raising_the_threshold_after_settling_settles_again() {
        let mut filter = DebounceFilter::new();
        feed(&mut filter, &[true; 2], 2);
        assert_eq!(filter.pos_trigger(true, 4), DebounceEvent::None);
        assert_eq!(filter.pos_trigger(true, 4), DebounceEvent::Settled);
    }

    #[test]
    fn zero_threshold_never_settles() {
        let mut filter = DebounceFilter::new();
        assert!(feed(&mut filter, &[true; 4], 0)
            .iter()
            .all(|e| *e == DebounceEvent::None));
    }

    #[test]
    fn polls_a_pin() {
        let pin = MockPin::default();
        let mut filter = DebounceFilter::new();
        pin.set(true);
        assert_eq!(filter.poll_pin(&pin, Edge::Rising, 2), Ok(DebounceEvent::None));
        assert_eq!(filter.poll_pin(&pin, Edge::Rising, 2), Ok(DebounceEvent::Settled));
        pin.set(false);
        assert_eq!(filter.poll_pin(&pin, Edge::Rising, 2), Ok(DebounceEvent::None));
        assert_eq!(filter.count(), 0);
    }
}
