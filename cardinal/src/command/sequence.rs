/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Sequential composite: children run one at a time, in order.
//!
//! ```text
//! init()      cursor = 0, init child[0]
//! update()    update child[cursor]
//!             └─ finished? → cursor += 1, init child[cursor] (if any)
//! finished    cursor == len
//! ```
//!
//! Later children are not initialised until their turn comes, so a child
//! that records a start time (e.g. [`WaitCommand`](super::WaitCommand))
//! measures from the moment it actually starts running.

use tracing::{debug, trace};

use super::{Command, CommandError};

/// Runs its children one after another.
///
/// Children are added while building the sequence, before it is scheduled.
///
/// ```
/// use std::time::Duration;
/// use cardinal::command::{CommandSequence, LogCommand, WaitCommand};
///
/// let sequence = CommandSequence::new()
///     .then(WaitCommand::new(Duration::from_millis(100)))
///     .then(LogCommand::new("arm raised"));
/// assert_eq!(sequence.len(), 2);
/// ```
pub struct CommandSequence {
    name: String,
    commands: Vec<Box<dyn Command>>,
    /// Index of the running child.  Only moves forward between two `init()`s.
    cursor: usize,
}

impl CommandSequence {
    pub fn new() -> Self {
        Self::named("sequence")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            cursor: 0,
        }
    }

    /// Append `command` and return the sequence, for chained construction.
    pub fn then(mut self, command: impl Command + 'static) -> Self {
        self.push(command);
        self
    }

    /// Append `command` in place.
    pub fn push(&mut self, command: impl Command + 'static) {
        self.commands.push(Box::new(command));
    }

    /// Take an already boxed child as-is.
    pub fn push_boxed(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Index of the child currently running (`len()` once finished).
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for CommandSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for CommandSequence {
    fn init(&mut self) -> Result<(), CommandError> {
        self.cursor = 0;
        if let Some(first) = self.commands.first_mut() {
            first.init()?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        let Some(current) = self.commands.get_mut(self.cursor) else {
            return Ok(());
        };

        current.update()?;

        if current.is_finished() {
            trace!(
                sequence = %self.name,
                step = self.cursor,
                child = current.name(),
                "step finished"
            );
            self.cursor += 1;
            if let Some(next) = self.commands.get_mut(self.cursor) {
                next.init()?;
            }
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    /// Cancels the running child only; children that have not started are
    /// never initialised.
    fn cancel(&mut self) -> Result<(), CommandError> {
        if let Some(current) = self.commands.get_mut(self.cursor) {
            debug!(sequence = %self.name, step = self.cursor, "cancelling running step");
            current.cancel()?;
        }
        self.cursor = self.commands.len();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
