//! Tick Countdowns
//!
//! Replaces suspend/resume timers (warm-up waits, delayed respawns, shield
//! windows) with explicit counters advanced once per tick.

use serde::{Serialize, Deserialize};

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Convert whole milliseconds into ticks, rounding to the nearest tick.
pub const fn millis_to_ticks(millis: u32) -> u32 {
    (millis * TICK_RATE + 500) / 1000
}

/// A countdown that fires once when it reaches zero.
///
/// A stopped countdown never fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    /// A countdown that is not running.
    pub const fn stopped() -> Self {
        Self { remaining: None }
    }

    /// Start a countdown that fires on the `ticks`-th advance.
    ///
    /// Durations are clamped to at least one advance: `start(0)` and
    /// `start(1)` both fire on the next advance, never immediately.
    pub const fn start(ticks: u32) -> Self {
        Self { remaining: Some(ticks) }
    }

    /// Restart with a new duration, clamped like [`Countdown::start`].
    pub fn restart(&mut self, ticks: u32) {
        self.remaining = Some(ticks);
    }

    /// Stop without firing.
    pub fn stop(&mut self) {
        self.remaining = None;
    }

    /// Is the countdown running?
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Ticks left before firing (None when stopped).
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Advance one tick. Returns true on the tick the countdown fires,
    /// after which it is stopped.
    pub fn advance(&mut self) -> bool {
        match self.remaining {
            None => false,
            Some(0) | Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_ticks() {
        assert_eq!(millis_to_ticks(2000), 120);
        assert_eq!(millis_to_ticks(2209), 133);
        assert_eq!(millis_to_ticks(2500), 150);
        assert_eq!(millis_to_ticks(500), 30);
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut c = Countdown::start(3);
        assert!(!c.advance());
        assert!(!c.advance());
        assert!(c.advance());
        assert!(!c.is_running());
        assert!(!c.advance());
    }

    #[test]
    fn test_zero_duration_clamps_to_one_advance() {
        let mut zero = Countdown::start(0);
        let mut one = Countdown::start(1);
        assert!(zero.is_running());
        assert!(zero.advance());
        assert!(one.advance());
        assert_eq!(zero, one);

        let mut c = Countdown::stopped();
        c.restart(0);
        assert!(c.advance());
        assert!(!c.is_running());
    }

    #[test]
    fn test_stopped_never_fires() {
        let mut c = Countdown::stopped();
        for _ in 0..10 {
            assert!(!c.advance());
        }
        c.restart(1);
        assert!(c.advance());
    }
}
