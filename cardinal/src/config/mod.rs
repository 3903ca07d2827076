/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Routine files: command trees and triggers described in YAML.
//!
//! The expected YAML structure is:
//! ```yaml
//! period_ms: 20
//! routine:
//!   sequence:
//!     - log: "raising arm"
//!     - parallel:
//!         - wait: 0.5
//!         - log: "intake on"
//!     - wait: 0.25
//! triggers:
//!   - name: heartbeat
//!     every_seconds: 1.0
//!     run:
//!       log: "heartbeat"
//! ```
//!
//! Every key is optional.  A step is a single-key map: `wait` (seconds),
//! `log` (message), `sequence` or `parallel` (list of steps).  A trigger has
//! exactly one of `every_seconds` / `after_seconds`.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::command::wait::secs_to_duration;
use crate::command::{
    Command, CommandHandle, CommandSequence, LogCommand, ParallelCommand, WaitCommand,
};
use crate::machine::{CommandMachine, MachineError};
use crate::trigger::Trigger;

/// Control-loop period used when the file does not set `period_ms`.
pub const DEFAULT_PERIOD_MS: u64 = 20;

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoutineFile {
    #[serde(default = "default_period_ms")]
    period_ms: u64,
    #[serde(default)]
    routine: Option<StepEntry>,
    #[serde(default)]
    triggers: Vec<TriggerEntry>,
}

fn default_period_ms() -> u64 {
    DEFAULT_PERIOD_MS
}

/// One step as written in YAML; exactly one field must be present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepEntry {
    wait: Option<f64>,
    log: Option<String>,
    sequence: Option<Vec<StepEntry>>,
    parallel: Option<Vec<StepEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriggerEntry {
    name: String,
    every_seconds: Option<f64>,
    after_seconds: Option<f64>,
    run: StepEntry,
}

// ── Public data structures ────────────────────────────────────────────────────

/// A validated node of a routine's command tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Wait(Duration),
    Log(String),
    Sequence(Vec<Step>),
    Parallel(Vec<Step>),
}

/// When a configured trigger's condition reads `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCondition {
    /// Once per elapsed interval, measured from when the routine is built.
    Every(Duration),
    /// Once, after the delay has elapsed since the routine was built.
    After(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerConfig {
    pub name: String,
    pub condition: TriggerCondition,
    pub run: Step,
}

/// A parsed and validated routine file.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineConfig {
    /// Control-loop period the runner ticks the machine at.
    pub period: Duration,
    /// Command scheduled once at start-up.
    pub routine: Option<Step>,
    pub triggers: Vec<TriggerConfig>,
}

/// Commands and triggers built from a [`RoutineConfig`], ready to hand to a
/// [`CommandMachine`].
pub struct Routine {
    pub period: Duration,
    pub command: Option<CommandHandle>,
    pub triggers: Vec<Trigger>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RoutineConfig {
    /// Parse and validate a routine from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, is not valid YAML, or
    /// describes an invalid routine.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading routine from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open routine file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid routine file: {}", path.display()))?;

        info!(
            period_ms = config.period.as_millis() as u64,
            has_routine = config.routine.is_some(),
            trigger_count = config.triggers.len(),
            "Successfully loaded routine"
        );
        for trigger in &config.triggers {
            debug!("  Trigger: {} | {:?}", trigger.name, trigger.condition);
        }

        Ok(config)
    }

    /// Parse and validate a routine from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RoutineFile = serde_yaml::from_str(yaml).context("Failed to parse YAML")?;

        ensure!(file.period_ms > 0, "period_ms must be greater than zero");

        let routine = file
            .routine
            .map(|entry| convert_step(entry, "routine"))
            .transpose()?;

        let triggers = file
            .triggers
            .into_iter()
            .enumerate()
            .map(|(i, entry)| convert_trigger(entry, &format!("triggers[{i}]")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            period: Duration::from_millis(file.period_ms),
            routine,
            triggers,
        })
    }

    /// Routine run by the `cardinal` binary when no file is given.
    pub fn demo() -> Self {
        Self {
            period: Duration::from_millis(DEFAULT_PERIOD_MS),
            routine: Some(Step::Sequence(vec![
                Step::Log("demo routine started".into()),
                Step::Parallel(vec![
                    Step::Wait(Duration::from_millis(500)),
                    Step::Sequence(vec![
                        Step::Wait(Duration::from_millis(200)),
                        Step::Log("first stage done".into()),
                    ]),
                ]),
                Step::Wait(Duration::from_millis(300)),
                Step::Log("demo routine finished".into()),
            ])),
            triggers: Vec::new(),
        }
    }

    /// Build the command tree and triggers, reading time from `clock`.
    pub fn build<C: Clock + Clone + 'static>(&self, clock: &C) -> Routine {
        let command = self
            .routine
            .as_ref()
            .map(|step| build_step(step, "routine", clock).into_handle());

        let triggers = self
            .triggers
            .iter()
            .map(|t| {
                let target = build_step(&t.run, &t.name, clock).into_handle();
                build_trigger(&t.name, t.condition, target, clock)
            })
            .collect();

        Routine {
            period: self.period,
            command,
            triggers,
        }
    }
}

impl Routine {
    /// Register the triggers on `machine` and schedule the start-up command.
    ///
    /// Returns the handle of the scheduled command, if there is one.
    pub fn install(
        self,
        machine: &mut CommandMachine,
    ) -> std::result::Result<Option<CommandHandle>, MachineError> {
        for trigger in self.triggers {
            machine.add_trigger(trigger);
        }
        if let Some(command) = &self.command {
            machine.schedule(command.clone())?;
        }
        Ok(self.command)
    }
}

// ── Validation / conversion ───────────────────────────────────────────────────

fn convert_step(entry: StepEntry, path: &str) -> Result<Step> {
    let StepEntry {
        wait,
        log,
        sequence,
        parallel,
    } = entry;

    match (wait, log, sequence, parallel) {
        (Some(seconds), None, None, None) => {
            ensure!(
                seconds.is_finite() && seconds >= 0.0,
                "{path}: wait must be a non-negative number of seconds, got {seconds}"
            );
            Ok(Step::Wait(secs_to_duration(seconds)))
        }
        (None, Some(message), None, None) => Ok(Step::Log(message)),
        (None, None, Some(children), None) => {
            convert_children(children, &format!("{path}.sequence")).map(Step::Sequence)
        }
        (None, None, None, Some(children)) => {
            convert_children(children, &format!("{path}.parallel")).map(Step::Parallel)
        }
        _ => bail!("{path}: a step needs exactly one of `wait`, `log`, `sequence`, `parallel`"),
    }
}

fn convert_children(children: Vec<StepEntry>, path: &str) -> Result<Vec<Step>> {
    children
        .into_iter()
        .enumerate()
        .map(|(i, child)| convert_step(child, &format!("{path}[{i}]")))
        .collect()
}

fn convert_trigger(entry: TriggerEntry, path: &str) -> Result<TriggerConfig> {
    ensure!(!entry.name.trim().is_empty(), "{path}: trigger name is empty");

    let condition = match (entry.every_seconds, entry.after_seconds) {
        (Some(every), None) => {
            ensure!(
                every.is_finite() && every > 0.0,
                "{path}: every_seconds must be a positive number, got {every}"
            );
            TriggerCondition::Every(secs_to_duration(every))
        }
        (None, Some(after)) => {
            ensure!(
                after.is_finite() && after >= 0.0,
                "{path}: after_seconds must be a non-negative number, got {after}"
            );
            TriggerCondition::After(secs_to_duration(after))
        }
        _ => bail!("{path}: set exactly one of `every_seconds` or `after_seconds`"),
    };

    let run = convert_step(entry.run, &format!("{path}.run"))?;

    Ok(TriggerConfig {
        name: entry.name,
        condition,
        run,
    })
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Composites are labelled with `name`; leaves keep their own labels.
fn build_step<C: Clock + Clone + 'static>(step: &Step, name: &str, clock: &C) -> Box<dyn Command> {
    match step {
        Step::Wait(duration) => Box::new(WaitCommand::with_clock(*duration, clock.clone())),
        Step::Log(message) => Box::new(LogCommand::new(message.clone())),
        Step::Sequence(children) => {
            let mut sequence = CommandSequence::named(name);
            for child in children {
                sequence.push_boxed(build_step(child, name, clock));
            }
            Box::new(sequence)
        }
        Step::Parallel(children) => {
            let mut parallel = ParallelCommand::named(name);
            for child in children {
                parallel.push_boxed(build_step(child, name, clock));
            }
            Box::new(parallel)
        }
    }
}

/// Conditions produce a single `true` sample per occurrence, so each
/// occurrence is a fresh rising edge.  `Every` therefore fires at most on
/// every other cycle, whatever its interval (zero included).
fn build_trigger<C: Clock + Clone + 'static>(
    name: &str,
    condition: TriggerCondition,
    target: CommandHandle,
    clock: &C,
) -> Trigger {
    let clock = clock.clone();
    let start = clock.now();

    match condition {
        TriggerCondition::After(delay) => Trigger::new(
            name,
            move || clock.elapsed_since(start) >= delay,
            target,
        ),
        TriggerCondition::Every(interval) => {
            let mut next = start.saturating_add(interval);
            let mut high = false;
            Trigger::new(
                name,
                move || {
                    let now = clock.now();
                    if !high && now >= next {
                        next = next_deadline(next, now, interval);
                        high = true;
                    } else {
                        high = false;
                    }
                    high
                },
                target,
            )
        }
    }
}

/// First deadline on the `interval` grid that lies after `now`.
///
/// Computed in one step so a long stall or a tiny interval costs nothing.  A
/// zero interval has no grid: the deadline becomes `now` and the condition
/// goes high on every sample that follows a low one.
fn next_deadline(deadline: Duration, now: Duration, interval: Duration) -> Duration {
    if interval.is_zero() {
        return now;
    }
    let missed = now.saturating_sub(deadline).as_nanos() / interval.as_nanos() + 1;
    let steps = u32::try_from(missed).unwrap_or(u32::MAX);
    deadline.saturating_add(interval.saturating_mul(steps))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
