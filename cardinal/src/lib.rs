/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Cardinal – cooperative command scheduler for fixed-rate control loops
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── clock         – monotonic time source + manual clock for tests
//! ├── command/      – Command trait, CommandHandle, built-in commands
//! │   ├── wait      – WaitCommand (finishes after a duration)
//! │   ├── log       – LogCommand (emits one message)
//! │   ├── sequence  – CommandSequence (children one after another)
//! │   └── parallel  – ParallelCommand (children side by side)
//! ├── trigger       – rising-edge condition → command
//! ├── machine/      – CommandMachine (one update() per control cycle)
//! ├── config/       – YAML routine files
//! ├── geometry/     – field poses and projectile formulas
//! └── runner        – fixed-period tokio loop around the machine
//! ```
//!
//! Everything runs on the caller's thread; nothing here is `Send`.

pub mod clock;
pub mod command;
pub mod config;
pub mod geometry;
pub mod machine;
pub mod runner;
pub mod trigger;

#[cfg(test)]
pub(crate) mod test_utils;
