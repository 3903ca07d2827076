/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Monotonic time sources for timer-based commands.
//!
//! Every time read in the crate goes through the [`Clock`] trait:
//!
//! * [`MonotonicClock`] – real time, backed by [`std::time::Instant`] and
//!   therefore immune to wall-clock adjustments.
//! * [`ManualClock`] – virtual time that only moves when told to.  Clones
//!   share the same time value, so a test can hand clones to any number of
//!   [`WaitCommand`](crate::command::WaitCommand)s and advance them all at
//!   once.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A non-decreasing time source.
///
/// `now()` is measured from an arbitrary, clock-specific origin; only
/// differences between two readings of the same clock are meaningful.
pub trait Clock {
    /// Current time since the clock's origin.
    fn now(&self) -> Duration;

    /// Time elapsed since an earlier reading `start`.
    ///
    /// Saturates at zero if `start` lies in the future.
    fn elapsed_since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

// ── MonotonicClock ────────────────────────────────────────────────────────────

/// Real monotonic clock.  The origin is the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// ── ManualClock ───────────────────────────────────────────────────────────────

/// Virtual clock driven explicitly by the caller.
///
/// ```
/// use std::time::Duration;
/// use cardinal::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
///
/// clock.advance(Duration::from_millis(20));
/// assert_eq!(shared.now(), Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// A clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock starting at `start`.
    pub fn starting_at(start: Duration) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Move time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get().saturating_add(step));
    }

    /// Jump to an absolute time.
    ///
    /// Going backwards is ignored so the clock stays monotonic.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(Duration::from_secs(5));
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.now(), Duration::from_millis(5_250));
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(2));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn elapsed_since_saturates_for_future_start() {
        let clock = ManualClock::starting_at(Duration::from_millis(10));
        assert_eq!(
            clock.elapsed_since(Duration::from_millis(30)),
            Duration::ZERO
        );
        assert_eq!(
            clock.elapsed_since(Duration::from_millis(4)),
            Duration::from_millis(6)
        );
    }

    #[test]
    fn monotonic_clock_does_not_decrease() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
