/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed-period control loop driving a [`CommandMachine`].

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::machine::{CommandMachine, MachineError};

/// Why [`run_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cycle limit was reached.
    MaxCycles,
    /// Nothing is active and no trigger can schedule anything new.
    Complete,
    /// The shutdown future resolved.
    Shutdown,
}

/// Call `machine.update()` once per `period` until one of the [`StopReason`]s
/// applies.
///
/// `shutdown` is polled for the whole run, so a signal that arrives while a
/// cycle is executing stops the loop before the next cycle starts.
///
/// # Errors
/// The first [`MachineError`] raised by a cycle.
///
/// # Panics
/// If `period` is zero.
pub async fn run_loop<F: Future>(
    machine: &mut CommandMachine,
    period: Duration,
    max_cycles: Option<u64>,
    shutdown: F,
) -> Result<StopReason, MachineError> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(cycle = machine.cycle(), "Interrupted, stopping");
                return Ok(StopReason::Shutdown);
            }
            _ = ticker.tick() => {}
        }

        let started = Instant::now();
        machine.update()?;
        let spent = started.elapsed();
        if spent > period {
            warn!(
                cycle = machine.cycle(),
                spent_us = spent.as_micros() as u64,
                period_us = period.as_micros() as u64,
                "cycle overran its period"
            );
        }

        if max_cycles.is_some_and(|max| machine.cycle() >= max) {
            info!(cycle = machine.cycle(), "Reached cycle limit, stopping");
            return Ok(StopReason::MaxCycles);
        }
        if machine.is_idle() && machine.trigger_len() == 0 {
            info!(cycle = machine.cycle(), "Routine complete");
            return Ok(StopReason::Complete);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
