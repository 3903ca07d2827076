/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error type returned by [`CommandMachine`](super::CommandMachine).
//!
//! The machine does not recover from anything: it wraps the underlying
//! [`CommandError`] with the cycle and the command or trigger that raised it,
//! and hands it to the caller.  The active and trigger lists keep whatever
//! state they had reached when the failure happened – there is no rollback.

use std::fmt;

use thiserror::Error;

use crate::command::CommandError;

/// Which lifecycle call a command was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Update,
    Cancel,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Init => write!(f, "init"),
            Phase::Update => write!(f, "update"),
            Phase::Cancel => write!(f, "cancel"),
        }
    }
}

/// Failure surfaced by a scheduling call.
#[derive(Debug, Error)]
pub enum MachineError {
    /// A command failed inside `init()`, `update()` or `cancel()`.
    ///
    /// `cycle` is the number of the cycle in progress, or of the last
    /// completed cycle when the failure happened outside `update()`.
    #[error("command '{command}' failed during {phase} in cycle {cycle}")]
    Command {
        command: String,
        phase: Phase,
        cycle: u64,
        #[source]
        source: CommandError,
    },

    /// A trigger condition failed while triggers were being evaluated.
    #[error("trigger '{trigger}' failed in cycle {cycle}")]
    Trigger {
        trigger: String,
        cycle: u64,
        #[source]
        source: CommandError,
    },
}

impl MachineError {
    /// The underlying command or condition failure.
    pub fn command_error(&self) -> &CommandError {
        match self {
            MachineError::Command { source, .. } | MachineError::Trigger { source, .. } => source,
        }
    }
}
