/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The command abstraction and its built-in implementations.
//!
//! A [`Command`] is one unit of robot behaviour with a three-step lifecycle:
//!
//! ```text
//! schedule ──► init() ──► update() ──► is_finished()? ──no──► update() ...
//!                                          │
//!                                         yes ──► retired (no more update())
//! ```
//!
//! Leaves ([`WaitCommand`], [`LogCommand`], or anything supplied by the
//! embedding application) do the actual work.  Composites
//! ([`CommandSequence`], [`ParallelCommand`]) own boxed children of the same
//! trait, so they nest to any depth without the machine knowing about it.
//!
//! Commands that are shared between the machine, triggers and composites are
//! referenced through a [`CommandHandle`].

pub mod error;
pub mod log;
pub mod parallel;
pub mod sequence;
pub mod wait;

pub use error::CommandError;
pub use log::LogCommand;
pub use parallel::ParallelCommand;
pub use sequence::CommandSequence;
pub use wait::WaitCommand;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// ── Command contract ──────────────────────────────────────────────────────────

/// A schedulable unit of behaviour.
///
/// # Contract
/// * `init()` is called exactly once per scheduling, before any `update()`.
/// * `update()` is called once per cycle while the command is not finished.
///   It must not block; delays are expressed by polling (see [`WaitCommand`]).
/// * `is_finished()` is a pure query.  Once it returns `true` it keeps
///   returning `true` until the next `init()`.  Commands that never finish
///   always return `false` and are stopped through `cancel()`.
pub trait Command {
    /// Establish initial state (record a start time, reset an index, ...).
    fn init(&mut self) -> Result<(), CommandError>;

    /// Advance the command by one cycle.
    fn update(&mut self) -> Result<(), CommandError>;

    /// `true` once the command has logically completed.
    fn is_finished(&self) -> bool;

    /// Stop the command before it finishes on its own.
    ///
    /// The default does nothing; the owner drops the command afterwards.
    fn cancel(&mut self) -> Result<(), CommandError> {
        Ok(())
    }

    /// Label used in log events and error messages.
    fn name(&self) -> &str {
        "command"
    }

    /// Wrap this command into a shared [`CommandHandle`].
    fn into_handle(self) -> CommandHandle
    where
        Self: Sized + 'static,
    {
        CommandHandle::new(self)
    }
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn init(&mut self) -> Result<(), CommandError> {
        (**self).init()
    }

    fn update(&mut self) -> Result<(), CommandError> {
        (**self).update()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }

    fn cancel(&mut self) -> Result<(), CommandError> {
        (**self).cancel()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ── CommandHandle ─────────────────────────────────────────────────────────────

/// Shared reference to one command instance.
///
/// The machine's active list, any number of [`Trigger`]s and composites may
/// all hold clones of the same handle; they all drive the *same* command, and
/// nothing is ever copied.  Identity is pointer identity, see
/// [`same`](Self::same).
///
/// The handle is itself a [`Command`], forwarding every call to the shared
/// instance.  A lifecycle call that arrives while the instance is already
/// executing (re-entrancy) fails with [`CommandError::Busy`].
///
/// [`Trigger`]: crate::trigger::Trigger
#[derive(Clone)]
pub struct CommandHandle {
    inner: Rc<RefCell<dyn Command>>,
    /// Cached at construction so logging never needs to borrow `inner`.
    name: Rc<str>,
}

impl CommandHandle {
    /// Move `command` behind a new shared handle.
    pub fn new<C: Command + 'static>(command: C) -> Self {
        let name: Rc<str> = Rc::from(command.name());
        let inner: Rc<RefCell<dyn Command>> = Rc::new(RefCell::new(command));
        Self { inner, name }
    }

    /// `true` if both handles refer to the same command instance.
    pub fn same(&self, other: &CommandHandle) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }

    fn enter<R>(
        &self,
        f: impl FnOnce(&mut dyn Command) -> Result<R, CommandError>,
    ) -> Result<R, CommandError> {
        let mut command = self
            .inner
            .try_borrow_mut()
            .map_err(|_| CommandError::Busy {
                command: self.name.to_string(),
            })?;
        f(&mut *command)
    }
}

impl Command for CommandHandle {
    fn init(&mut self) -> Result<(), CommandError> {
        self.enter(|c| c.init())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        self.enter(|c| c.update())
    }

    /// A command that is in the middle of one of its own lifecycle calls is
    /// reported as not finished.
    fn is_finished(&self) -> bool {
        self.inner
            .try_borrow()
            .map(|c| c.is_finished())
            .unwrap_or(false)
    }

    fn cancel(&mut self) -> Result<(), CommandError> {
        self.enter(|c| c.cancel())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn into_handle(self) -> CommandHandle {
        self
    }
}

impl fmt::Debug for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandle")
            .field("name", &self.name)
            .field("strong_count", &Rc::strong_count(&self.inner))
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Probe;

    #[test]
    fn clones_refer_to_the_same_instance() {
        let probe = Probe::new("p");
        let a = CommandHandle::new(probe.clone());
        let b = a.clone();
        assert!(a.same(&b));

        let mut b = b;
        b.init().unwrap();
        b.update().unwrap();
        assert_eq!(probe.init_calls(), 1);
        assert_eq!(probe.update_calls(), 1);
    }

    #[test]
    fn separate_handles_are_distinct() {
        let a = CommandHandle::new(Probe::new("p"));
        let b = CommandHandle::new(Probe::new("p"));
        assert!(!a.same(&b));
    }

    #[test]
    fn handle_caches_command_name() {
        let handle = Probe::new("drive").into_handle();
        assert_eq!(handle.name(), "drive");
    }

    #[test]
    fn into_handle_on_a_handle_keeps_identity() {
        let a = Probe::new("p").into_handle();
        let b = a.clone().into_handle();
        assert!(a.same(&b));
    }

    #[test]
    fn reentrant_call_reports_busy_instead_of_panicking() {
        let probe = Probe::new("p").finish_after(1);
        let handle = probe.clone().into_handle();

        handle
            .enter(|_| {
                let mut again = handle.clone();
                let err = again.update().unwrap_err();
                assert!(matches!(err, CommandError::Busy { ref command } if command == "p"));
                // An executing command is never reported finished.
                assert!(!again.is_finished());
                Ok(())
            })
            .unwrap();

        assert_eq!(probe.update_calls(), 0);
    }
}
