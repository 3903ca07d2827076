/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error type raised by command implementations and trigger conditions.
//!
//! The scheduling core never catches these: a [`CommandError`] returned from
//! `init()`, `update()` or `cancel()` travels up through any enclosing
//! composite and out of
//! [`CommandMachine::update()`](crate::machine::CommandMachine::update),
//! where it is wrapped with cycle context in a
//! [`MachineError`](crate::machine::MachineError).

use thiserror::Error;

/// Failure raised while running a single command or evaluating a condition.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A command implementation reported a fault (sensor read failed,
    /// actuator rejected a value, ...).
    #[error("command '{command}' failed: {reason}")]
    Fault { command: String, reason: String },

    /// A fallible trigger condition could not be evaluated.
    #[error("trigger condition failed: {reason}")]
    Condition { reason: String },

    /// A shared command was entered again while one of its own lifecycle
    /// calls was still running (e.g. a command scheduling itself).
    #[error("command '{command}' is already executing and cannot be re-entered")]
    Busy { command: String },

    /// A [`Scheduler`](crate::machine::Scheduler) outlived the machine it
    /// feeds, so the command has nowhere to run.
    #[error("cannot schedule '{command}': the command machine no longer exists")]
    Detached { command: String },
}

impl CommandError {
    /// Shorthand for [`CommandError::Fault`].
    pub fn fault(command: impl Into<String>, reason: impl Into<String>) -> Self {
        CommandError::Fault {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CommandError::Condition`].
    pub fn condition(reason: impl Into<String>) -> Self {
        CommandError::Condition {
            reason: reason.into(),
        }
    }
}
