/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Instrumented test double shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::command::{Command, CommandError};

/// Ordered record of lifecycle calls across several probes, e.g.
/// `["a.init", "a.update", "b.init"]`.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Default)]
struct ProbeState {
    init_calls: Cell<u32>,
    update_calls: Cell<u32>,
    finished_calls: Cell<u32>,
    cancel_calls: Cell<u32>,
    /// `update()` calls since the most recent `init()`.
    updates_since_init: Cell<u32>,
    update_before_init: Cell<u32>,
    update_after_finish: Cell<u32>,
    finish_after: Cell<Option<u32>>,
    fail_on_update: Cell<Option<u32>>,
    fail_on_init: Cell<bool>,
    cancelled: Cell<bool>,
    journal: RefCell<Option<Journal>>,
}

/// A command that counts every lifecycle call.
///
/// Clones share their counters, so a test keeps one clone for assertions and
/// hands the other to the code under test.  By default a probe never
/// finishes; [`finish_after`](Self::finish_after) makes it finish after a
/// number of `update()` calls.
#[derive(Clone)]
pub struct Probe {
    name: String,
    state: Rc<ProbeState>,
}

impl Probe {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Rc::new(ProbeState::default()),
        }
    }

    /// Finish once `n` updates have happened since the last `init()`.
    /// `n == 0` means finished right after `init()`.
    pub fn finish_after(self, n: u32) -> Self {
        self.state.finish_after.set(Some(n));
        self
    }

    /// Return a fault from the `n`-th update after `init()` (1-based).
    pub fn fail_on_update(self, n: u32) -> Self {
        self.state.fail_on_update.set(Some(n));
        self
    }

    pub fn fail_on_init(self) -> Self {
        self.state.fail_on_init.set(true);
        self
    }

    pub fn recording(self, journal: &Journal) -> Self {
        *self.state.journal.borrow_mut() = Some(journal.clone());
        self
    }

    pub fn init_calls(&self) -> u32 {
        self.state.init_calls.get()
    }

    pub fn update_calls(&self) -> u32 {
        self.state.update_calls.get()
    }

    pub fn finished_calls(&self) -> u32 {
        self.state.finished_calls.get()
    }

    pub fn cancel_calls(&self) -> u32 {
        self.state.cancel_calls.get()
    }

    pub fn update_before_init(&self) -> u32 {
        self.state.update_before_init.get()
    }

    pub fn update_after_finish(&self) -> u32 {
        self.state.update_after_finish.get()
    }

    fn record(&self, event: &str) {
        if let Some(journal) = self.state.journal.borrow().as_ref() {
            journal.borrow_mut().push(format!("{}.{}", self.name, event));
        }
    }

    fn done(&self) -> bool {
        if self.state.cancelled.get() {
            return true;
        }
        if self.state.init_calls.get() == 0 {
            return false;
        }
        match self.state.finish_after.get() {
            Some(n) => self.state.updates_since_init.get() >= n,
            None => false,
        }
    }
}

impl Command for Probe {
    fn init(&mut self) -> Result<(), CommandError> {
        self.record("init");
        let s = &self.state;
        s.init_calls.set(s.init_calls.get() + 1);
        s.updates_since_init.set(0);
        s.cancelled.set(false);
        if s.fail_on_init.get() {
            return Err(CommandError::fault(&self.name, "injected init fault"));
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), CommandError> {
        self.record("update");
        if self.state.init_calls.get() == 0 {
            self.state
                .update_before_init
                .set(self.state.update_before_init.get() + 1);
        }
        if self.done() {
            self.state
                .update_after_finish
                .set(self.state.update_after_finish.get() + 1);
        }
        let s = &self.state;
        s.update_calls.set(s.update_calls.get() + 1);
        s.updates_since_init.set(s.updates_since_init.get() + 1);
        if s.fail_on_update.get() == Some(s.updates_since_init.get()) {
            return Err(CommandError::fault(&self.name, "injected update fault"));
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        let s = &self.state;
        s.finished_calls.set(s.finished_calls.get() + 1);
        self.done()
    }

    fn cancel(&mut self) -> Result<(), CommandError> {
        self.record("cancel");
        let s = &self.state;
        s.cancel_calls.set(s.cancel_calls.get() + 1);
        s.cancelled.set(true);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
