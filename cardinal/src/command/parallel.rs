/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Parallel composite: every unfinished child advances every cycle.
//!
//! "Parallel" is logical only – all children run on the caller's thread,
//! one after another, within the same cycle.
//!
//! | | [`CommandSequence`](super::CommandSequence) | [`ParallelCommand`] |
//! |---|---|---|
//! | children updated per cycle | exactly one | all unfinished |
//! | child `init()` | when its turn comes | all at once in `init()` |
//! | finished when | last child finishes | slowest child finishes |

use tracing::{debug, trace};

use super::{Command, CommandError};

/// Runs all of its children side by side.
///
/// Finished children are dropped from the tracking list at the start of the
/// next `update()` and never touched again.
///
/// # `is_finished()` call pattern
/// Each `update()` asks every tracked child `is_finished()` once while
/// pruning, and once more for every survivor just before updating it.  This
/// is harmless as long as children honour the side-effect-free contract of
/// [`Command::is_finished`].
pub struct ParallelCommand {
    name: String,
    commands: Vec<Box<dyn Command>>,
}

impl ParallelCommand {
    pub fn new() -> Self {
        Self::named("parallel")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Add `command` to the group and return it, for chained construction.
    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.push(command);
        self
    }

    /// Add `command` in place.
    pub fn push(&mut self, command: impl Command + 'static) {
        self.commands.push(Box::new(command));
    }

    /// Take an already boxed child as-is.
    pub fn push_boxed(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    /// Number of children still being tracked.
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl Default for ParallelCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ParallelCommand {
    fn init(&mut self) -> Result<(), CommandError> {
        for command in &mut self.commands {
            command.init()?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        let before = self.commands.len();
        self.commands.retain(|c| !c.is_finished());
        if self.commands.len() != before {
            trace!(
                parallel = %self.name,
                dropped = before - self.commands.len(),
                remaining = self.commands.len(),
                "children finished"
            );
        }

        for command in &mut self.commands {
            if !command.is_finished() {
                command.update()?;
            }
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.commands.iter().all(|c| c.is_finished())
    }

    /// Cancels every child that is still running and stops tracking all of
    /// them.
    fn cancel(&mut self) -> Result<(), CommandError> {
        debug!(parallel = %self.name, remaining = self.commands.len(), "cancelling children");
        for command in &mut self.commands {
            if !command.is_finished() {
                command.cancel()?;
            }
        }
        self.commands.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
