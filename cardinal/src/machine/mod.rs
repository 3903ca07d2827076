/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The top-level command scheduler.
//!
//! [`CommandMachine`] owns the list of active commands and the list of
//! registered triggers, and advances both by one step per call to
//! [`update()`](CommandMachine::update):
//!
//! ```text
//! update()  ──►  1. every active command, in scheduling order:
//!                     update() → is_finished()? → retire
//!                2. every trigger, in registration order:
//!                     check() → rising edge? → schedule(target)
//! ```
//!
//! # Ordering guarantees
//! * A command is initialised when it is scheduled, and receives its first
//!   `update()` in the *next* call to `update()` – never in the call that
//!   scheduled it, whether that was a trigger or a running command (through
//!   a [`Scheduler`]).
//! * Every scheduled command gets at least one `update()`, because
//!   `is_finished()` is only consulted after `update()`.
//! * All commands advance before any trigger is evaluated.
//!
//! Everything runs on the caller's thread; nothing here blocks.

pub mod error;

pub use error::{MachineError, Phase};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::command::{Command, CommandError, CommandHandle};
use crate::trigger::Trigger;

/// Commands queued through a [`Scheduler`], waiting to join the active list.
type PendingQueue = Rc<RefCell<Vec<CommandHandle>>>;

// ── CycleReport ───────────────────────────────────────────────────────────────

/// What happened during one call to [`CommandMachine::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based number of this cycle.
    pub cycle: u64,
    /// Commands that received `update()`.
    pub updated: usize,
    /// Commands that finished and were removed.
    pub retired: usize,
    /// Triggers that fired and scheduled their target.
    pub fired: usize,
}

// ── CommandMachine ────────────────────────────────────────────────────────────

/// Cooperative scheduler for commands and triggers.
///
/// ```
/// use std::time::Duration;
/// use cardinal::clock::ManualClock;
/// use cardinal::command::WaitCommand;
/// use cardinal::machine::CommandMachine;
///
/// let clock = ManualClock::new();
/// let mut machine = CommandMachine::new();
/// machine
///     .spawn(WaitCommand::with_clock(Duration::from_millis(40), clock.clone()))
///     .unwrap();
///
/// while !machine.is_idle() {
///     clock.advance(Duration::from_millis(20));
///     machine.update().unwrap();
/// }
/// assert_eq!(machine.cycle(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CommandMachine {
    /// Running commands, in scheduling order.
    active: Vec<CommandHandle>,
    /// Registered triggers, in registration order.
    triggers: Vec<Trigger>,
    pending: PendingQueue,
    /// Number of the last cycle started by `update()`.
    cycle: u64,
}

impl CommandMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `trigger`; it is checked at the end of every cycle.
    ///
    /// No de-duplication is done.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        debug!(
            trigger = trigger.name(),
            command = trigger.target().name(),
            "trigger registered"
        );
        self.triggers.push(trigger);
    }

    /// Initialise `command` now and add it to the active list.
    ///
    /// Its first `update()` happens on the next call to
    /// [`update()`](Self::update).  Scheduling an instance that is already
    /// active initialises it again and tracks it twice.
    ///
    /// # Errors
    /// [`MachineError::Command`] with [`Phase::Init`] if `init()` fails; the
    /// command is then not added.
    pub fn schedule(&mut self, mut command: CommandHandle) -> Result<(), MachineError> {
        if self.is_active(&command) {
            warn!(
                command = command.name(),
                cycle = self.cycle,
                "command scheduled while already active – it will be tracked twice"
            );
        }

        command
            .init()
            .map_err(|source| self.command_error(&command, Phase::Init, source))?;

        debug!(command = command.name(), cycle = self.cycle, "scheduled");
        self.active.push(command);
        Ok(())
    }

    /// Wrap `command` in a handle, schedule it and return the handle.
    pub fn spawn(
        &mut self,
        command: impl Command + 'static,
    ) -> Result<CommandHandle, MachineError> {
        let handle = command.into_handle();
        self.schedule(handle.clone())?;
        Ok(handle)
    }

    /// Run one scheduling cycle.
    ///
    /// # Errors
    /// The first failing command or trigger aborts the rest of the cycle.
    /// Commands retired before the failure stay retired and everything not
    /// yet visited stays where it was.
    pub fn update(&mut self) -> Result<CycleReport, MachineError> {
        self.cycle += 1;
        let cycle = self.cycle;
        let mut report = CycleReport {
            cycle,
            ..Default::default()
        };

        // Queued between cycles: these run now.
        self.adopt_pending();

        // ── 1. Advance active commands ────────────────────────────────────────
        let mut i = 0;
        while i < self.active.len() {
            let command = &mut self.active[i];
            command
                .update()
                .map_err(|source| MachineError::Command {
                    command: command.name().to_string(),
                    phase: Phase::Update,
                    cycle,
                    source,
                })?;
            report.updated += 1;

            if command.is_finished() {
                debug!(command = command.name(), cycle, "retired");
                self.active.remove(i);
                report.retired += 1;
            } else {
                i += 1;
            }
        }

        // Queued by commands during the pass above: first update next cycle.
        self.adopt_pending();

        // ── 2. Evaluate triggers ──────────────────────────────────────────────
        for index in 0..self.triggers.len() {
            let trigger = &mut self.triggers[index];
            let fired = trigger.check().map_err(|source| MachineError::Trigger {
                trigger: trigger.name().to_string(),
                cycle,
                source,
            })?;

            if let Some(command) = fired {
                debug!(
                    trigger = trigger.name(),
                    command = command.name(),
                    cycle,
                    "trigger fired"
                );
                report.fired += 1;
                self.schedule(command)?;
            }
        }

        self.adopt_pending();

        trace!(
            cycle,
            updated = report.updated,
            retired = report.retired,
            fired = report.fired,
            active = self.active.len(),
            "cycle complete"
        );
        Ok(report)
    }

    /// Stop `command` without waiting for it to finish.
    ///
    /// Every active or queued entry referring to the same instance is
    /// removed, then the command's `cancel()` runs once.  Returns `false`
    /// (and calls nothing) if the command was not active.
    pub fn cancel(&mut self, command: &CommandHandle) -> Result<bool, MachineError> {
        let before = self.active.len();
        self.active.retain(|c| !c.same(command));
        let mut removed = before - self.active.len();

        {
            let mut pending = self.pending.borrow_mut();
            let before = pending.len();
            pending.retain(|c| !c.same(command));
            removed += before - pending.len();
        }

        if removed == 0 {
            return Ok(false);
        }

        let mut target = command.clone();
        target
            .cancel()
            .map_err(|source| self.command_error(command, Phase::Cancel, source))?;

        debug!(
            command = command.name(),
            entries = removed,
            cycle = self.cycle,
            "cancelled"
        );
        Ok(true)
    }

    /// A handle for scheduling from inside running commands or trigger
    /// conditions.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler {
            pending: Rc::downgrade(&self.pending),
        }
    }

    /// Number of the last cycle run (0 before the first `update()`).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Number of active entries, counting queued commands and duplicates.
    pub fn active_len(&self) -> usize {
        self.active.len() + self.pending.borrow().len()
    }

    pub fn trigger_len(&self) -> usize {
        self.triggers.len()
    }

    /// `true` when no command is active or queued.
    pub fn is_idle(&self) -> bool {
        self.active_len() == 0
    }

    /// `true` if `command` is active or queued.
    pub fn is_active(&self, command: &CommandHandle) -> bool {
        self.active.iter().any(|c| c.same(command))
            || self.pending.borrow().iter().any(|c| c.same(command))
    }

    fn adopt_pending(&mut self) {
        let queued = std::mem::take(&mut *self.pending.borrow_mut());
        for command in queued {
            debug!(command = command.name(), cycle = self.cycle, "adopted from scheduler");
            self.active.push(command);
        }
    }

    fn command_error(
        &self,
        command: &CommandHandle,
        phase: Phase,
        source: CommandError,
    ) -> MachineError {
        MachineError::Command {
            command: command.name().to_string(),
            phase,
            cycle: self.cycle,
            source,
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Schedules commands onto a [`CommandMachine`] from code that cannot borrow
/// the machine, such as a running command's `update()`.
///
/// Obtained from [`CommandMachine::scheduler`].  The command is initialised
/// immediately and joins the machine's active list without being updated in
/// the current cycle.  The handle does not keep the machine alive.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pending: Weak<RefCell<Vec<CommandHandle>>>,
}

impl Scheduler {
    /// Initialise `command` and queue it on the machine.
    ///
    /// # Errors
    /// * the command's own `init()` error;
    /// * [`CommandError::Busy`] if the command is the one currently running;
    /// * [`CommandError::Detached`] if the machine has been dropped.
    pub fn schedule(&self, mut command: CommandHandle) -> Result<(), CommandError> {
        let Some(pending) = self.pending.upgrade() else {
            return Err(CommandError::Detached {
                command: command.name().to_string(),
            });
        };

        command.init()?;
        debug!(command = command.name(), "queued by scheduler");
        pending.borrow_mut().push(command);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
