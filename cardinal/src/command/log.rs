/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! One-shot leaf that writes a message to the log.

use tracing::info;

use super::{Command, CommandError};

/// Emits `message` as an `info!` event on its single `update()`, then
/// finishes.
#[derive(Debug, Clone)]
pub struct LogCommand {
    message: String,
    done: bool,
}

impl LogCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            done: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Command for LogCommand {
    fn init(&mut self) -> Result<(), CommandError> {
        self.done = false;
        Ok(())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        if !self.done {
            info!(target: "cardinal::routine", "{}", self.message);
            self.done = true;
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.done
    }

    fn name(&self) -> &str {
        "log"
    }
}
