//! Quiet-period debouncing of raw query input.
//!
//! The plugin runtime only offers one-shot timers that fire a payload-less
//! tick, so the debouncer keeps at most one wake-up armed and tells the caller
//! when to arm another.

use std::time::{Duration, Instant};

/// Default quiet period before a typed query is committed.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

/// Tolerance for timers delivered slightly early.
const TIMER_SLACK: Duration = Duration::from_millis(10);

/// Result of polling the debouncer on a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceStep {
    /// The quiet period elapsed; commit this value.
    Emit(String),
    /// A newer value moved the deadline; arm a timer for this long.
    Rearm(Duration),
    /// Nothing to do.
    Idle,
}

/// Collapses bursts of input into the most recent value.
#[derive(Debug)]
pub struct QueryDebouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    wake_at: Option<Instant>,
}

impl QueryDebouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            wake_at: None,
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records `value` as the latest input, restarting the quiet period.
    ///
    /// Returns the delay to arm a timer for, or `None` if a wake-up is
    /// already armed.
    pub fn push(&mut self, value: String, now: Instant) -> Option<Duration> {
        let deadline = now + self.quiet;
        self.pending = Some((value, deadline));

        if self.wake_at.is_some() {
            return None;
        }
        self.wake_at = Some(deadline);
        Some(self.quiet)
    }

    /// Checks the pending value against the clock. Call on every timer tick.
    pub fn poll(&mut self, now: Instant) -> DebounceStep {
        let horizon = now + TIMER_SLACK;

        if self.wake_at.is_some_and(|wake| horizon >= wake) {
            self.wake_at = None;
        }

        let Some((_, deadline)) = &self.pending else {
            return DebounceStep::Idle;
        };
        let deadline = *deadline;

        if horizon >= deadline {
            self.wake_at = None;
            return match self.pending.take() {
                Some((value, _)) => DebounceStep::Emit(value),
                None => DebounceStep::Idle,
            };
        }

        if self.wake_at.is_none() {
            self.wake_at = Some(deadline);
            return DebounceStep::Rearm(deadline.saturating_duration_since(now));
        }

        DebounceStep::Idle
    }

    /// Drops the pending value. An already armed wake-up fires into `Idle`.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_emits_only_last_value_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::default();

        assert_eq!(debouncer.push("cat".into(), t0), Some(ms(250)));
        assert_eq!(debouncer.push("cats".into(), t0 + ms(50)), None);
        assert_eq!(debouncer.push("catsx".into(), t0 + ms(100)), None);

        assert_eq!(debouncer.poll(t0 + ms(250)), DebounceStep::Rearm(ms(100)));
        assert_eq!(debouncer.poll(t0 + ms(350)), DebounceStep::Emit("catsx".into()));
        assert!(!debouncer.has_pending());
        assert_eq!(debouncer.poll(t0 + ms(400)), DebounceStep::Idle);
    }

    #[test]
    fn single_value_emits_when_timer_fires() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::new(ms(100));
        debouncer.push("dog".into(), t0);

        assert_eq!(debouncer.poll(t0 + ms(100)), DebounceStep::Emit("dog".into()));
    }

    #[test]
    fn slightly_early_tick_still_emits() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::default();
        debouncer.push("dog".into(), t0);

        assert_eq!(debouncer.poll(t0 + ms(245)), DebounceStep::Emit("dog".into()));
    }

    #[test]
    fn unrelated_tick_before_wake_is_idle() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::default();
        debouncer.push("dog".into(), t0);

        assert_eq!(debouncer.poll(t0 + ms(100)), DebounceStep::Idle);
        assert_eq!(debouncer.poll(t0 + ms(250)), DebounceStep::Emit("dog".into()));
    }

    #[test]
    fn empty_stream_never_emits() {
        let mut debouncer = QueryDebouncer::default();
        assert_eq!(debouncer.poll(Instant::now() + ms(1000)), DebounceStep::Idle);
    }

    #[test]
    fn cancelled_value_is_not_emitted() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::default();
        debouncer.push("dog".into(), t0);
        debouncer.cancel();

        assert_eq!(debouncer.poll(t0 + ms(250)), DebounceStep::Idle);
    }

    #[test]
    fn push_after_armed_timer_fired_arms_again() {
        let t0 = Instant::now();
        let mut debouncer = QueryDebouncer::default();
        debouncer.push("dog".into(), t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + ms(250)), DebounceStep::Idle);

        assert_eq!(debouncer.push("bird".into(), t0 + ms(300)), Some(ms(250)));
    }
}
