/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timer leaf command.

use std::time::Duration;

use super::{Command, CommandError};
use crate::clock::{Clock, MonotonicClock};

/// Finishes once a fixed duration has elapsed since `init()`.
///
/// `update()` does nothing; completion is polled from the clock, so the
/// command never blocks the control loop.  Before `init()` it reports not
/// finished.
#[derive(Debug, Clone)]
pub struct WaitCommand<C: Clock = MonotonicClock> {
    duration: Duration,
    started_at: Option<Duration>,
    cancelled: bool,
    clock: C,
}

impl WaitCommand<MonotonicClock> {
    /// Wait for `duration` of real monotonic time.
    pub fn new(duration: Duration) -> Self {
        Self::with_clock(duration, MonotonicClock::new())
    }

    /// Wait for `seconds` of real time.
    ///
    /// Negative and NaN values wait for zero time; values too large for a
    /// [`Duration`] wait forever.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self::new(secs_to_duration(seconds))
    }
}

impl<C: Clock> WaitCommand<C> {
    /// Wait for `duration` as measured by `clock`.
    pub fn with_clock(duration: Duration, clock: C) -> Self {
        Self {
            duration,
            started_at: None,
            cancelled: false,
            clock,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left before the command finishes, or the full duration when it
    /// has not been started.
    pub fn remaining(&self) -> Duration {
        match self.started_at {
            Some(start) => self
                .duration
                .saturating_sub(self.clock.elapsed_since(start)),
            None => self.duration,
        }
    }
}

impl<C: Clock> Command for WaitCommand<C> {
    fn init(&mut self) -> Result<(), CommandError> {
        self.started_at = Some(self.clock.now());
        self.cancelled = false;
        Ok(())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        Ok(())
    }

    fn is_finished(&self) -> bool {
        if self.cancelled {
            return true;
        }
        match self.started_at {
            Some(start) => self.clock.elapsed_since(start) >= self.duration,
            None => false,
        }
    }

    fn cancel(&mut self) -> Result<(), CommandError> {
        self.cancelled = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "wait"
    }
}

/// Convert a user-facing seconds value into a [`Duration`].
pub(crate) fn secs_to_duration(seconds: f64) -> Duration {
    // f64::max ignores NaN, so NaN becomes 0.0 here
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
