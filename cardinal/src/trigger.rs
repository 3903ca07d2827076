/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Edge-triggered command scheduling.
//!
//! A [`Trigger`] samples a boolean condition once per machine cycle and fires
//! on the rising edge only:
//!
//! ```text
//! condition  F  F  T  T  T  F  T
//! fires      .  .  ✓  .  .  .  ✓
//! ```
//!
//! A condition that stays `true` fires exactly once; it has to drop back to
//! `false` before it can fire again.

use std::fmt;

use crate::command::{CommandError, CommandHandle};

type Condition = Box<dyn FnMut() -> Result<bool, CommandError>>;

/// Binds a condition to the command it schedules.
///
/// The target is referenced through a [`CommandHandle`], so the same command
/// may also be held elsewhere (another trigger, a composite, the caller).
/// Firing again while an earlier run of the target is still active schedules
/// it a second time; nothing here de-duplicates.
pub struct Trigger {
    name: String,
    condition: Condition,
    command: CommandHandle,
    last_state: bool,
}

impl Trigger {
    /// Trigger on an infallible condition, e.g. a button read.
    pub fn new(
        name: impl Into<String>,
        mut condition: impl FnMut() -> bool + 'static,
        command: CommandHandle,
    ) -> Self {
        Self::try_new(name, move || Ok(condition()), command)
    }

    /// Trigger on a condition that can fail, e.g. a sensor threshold whose
    /// read may error.
    pub fn try_new(
        name: impl Into<String>,
        condition: impl FnMut() -> Result<bool, CommandError> + 'static,
        command: CommandHandle,
    ) -> Self {
        Self {
            name: name.into(),
            condition: Box::new(condition),
            command,
            last_state: false,
        }
    }

    /// Sample the condition.
    ///
    /// Returns the target command on a false→true transition and `None`
    /// otherwise.  If the condition fails, the edge state is left untouched
    /// and the error is returned.
    pub fn check(&mut self) -> Result<Option<CommandHandle>, CommandError> {
        let current = (self.condition)()?;

        if current && !self.last_state {
            self.last_state = true;
            return Ok(Some(self.command.clone()));
        }

        self.last_state = current;
        Ok(None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &CommandHandle {
        &self.command
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("last_state", &self.last_state)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::test_utils::Probe;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Trigger whose condition replays `samples` one per `check()`.
    fn scripted(samples: &[bool]) -> (Trigger, CommandHandle) {
        let samples = samples.to_vec();
        let mut i = 0;
        let target = Probe::new("target").into_handle();
        let trigger = Trigger::new(
            "scripted",
            move || {
                let v = samples[i];
                i += 1;
                v
            },
            target.clone(),
        );
        (trigger, target)
    }

    #[test]
    fn fires_on_rising_edges_only() {
        let samples = [false, false, true, true, true, false, true];
        let (mut trigger, target) = scripted(&samples);

        let fired: Vec<usize> = (0..samples.len())
            .filter(|_| trigger.check().unwrap().is_some())
            .collect();

        assert_eq!(fired, vec![2, 6], "fires at the 3rd and 7th samples");
        assert!(trigger.target().same(&target));
    }

    #[test]
    fn held_condition_fires_once() {
        let (mut trigger, _) = scripted(&[true; 20]);
        let fires = (0..20).filter(|_| trigger.check().unwrap().is_some()).count();
        assert_eq!(fires, 1);
    }

    #[test]
    fn initially_true_condition_fires_on_first_check() {
        let (mut trigger, _) = scripted(&[true]);
        assert!(trigger.check().unwrap().is_some());
    }

    #[test]
    fn returned_handle_is_the_bound_target() {
        let (mut trigger, target) = scripted(&[true]);
        let fired = trigger.check().unwrap().unwrap();
        assert!(fired.same(&target));
    }

    #[test]
    fn failing_condition_keeps_edge_state() {
        let step = Rc::new(Cell::new(0));
        let s = step.clone();
        let mut trigger = Trigger::try_new(
            "flaky",
            move || {
                let n = s.get();
                s.set(n + 1);
                match n {
                    0 => Ok(true),
                    1 => Err(CommandError::condition("sensor timeout")),
                    _ => Ok(true),
                }
            },
            Probe::new("t").into_handle(),
        );

        assert!(trigger.check().unwrap().is_some());
        assert!(trigger.check().is_err());
        // Still high from before the failure: no new edge.
        assert!(trigger.check().unwrap().is_none());
    }
}
