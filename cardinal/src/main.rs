/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use cardinal::clock::MonotonicClock;
use cardinal::config::RoutineConfig;
use cardinal::machine::CommandMachine;
use cardinal::runner::run_loop;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Cardinal command scheduler.
///
/// Example:
///   cardinal --routine routines/auto.yaml --period-ms 20 --max-cycles 500
#[derive(Debug, Parser)]
#[command(
    name = "cardinal",
    about = "Cardinal – run a command routine on a fixed-period control loop",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML routine file.  A built-in demo runs when omitted.
    #[arg(short = 'r', long = "routine")]
    routine: Option<PathBuf>,

    /// Control-loop period in milliseconds (overrides `period_ms` in the file).
    #[arg(short = 'p', long = "period-ms")]
    period_ms: Option<u64>,

    /// Stop after this many cycles.
    #[arg(short = 'n', long = "max-cycles")]
    max_cycles: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        routine    = ?cli.routine,
        period_ms  = ?cli.period_ms,
        max_cycles = ?cli.max_cycles,
        "Cardinal starting up..."
    );

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Load routine ──────────────────────────────────────────────────────────
    let config = match &cli.routine {
        Some(path) => RoutineConfig::load_from_file(path)?,
        None => {
            warn!("No routine file provided, running the built-in demo routine");
            RoutineConfig::demo()
        }
    };

    let period = match cli.period_ms {
        Some(0) => anyhow::bail!("--period-ms must be greater than zero"),
        Some(ms) => Duration::from_millis(ms),
        None => config.period,
    };

    let routine = config.build(&MonotonicClock::new());
    let mut machine = CommandMachine::new();
    routine.install(&mut machine)?;

    info!(
        period_ms = period.as_millis() as u64,
        active = machine.active_len(),
        triggers = machine.trigger_len(),
        "Control loop running"
    );

    // ── Control loop ──────────────────────────────────────────────────────────
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let reason = run_loop(&mut machine, period, cli.max_cycles, ctrl_c).await?;
    info!(?reason, cycles = machine.cycle(), "Cardinal stopped");

    Ok(())
}
