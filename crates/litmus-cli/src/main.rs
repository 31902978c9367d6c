//! `litmus`: run a built-in litmus test and report the states it produced.

use clap::{Parser, ValueEnum};
use litmus_core::{Outcome, Report};
use litmus_harness::{PermuteStrategy, RunConfig, Runner, SyncStrategy};
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "litmus", version, about = "Empirical litmus testing of shared-memory behaviour")]
struct Cli {
    /// Name of the built-in test to run (see --list).
    test: Option<String>,

    /// Total rounds to execute.
    #[arg(long, default_value_t = 100_000)]
    iterations: usize,

    /// Tear down and respawn the worker threads every N rounds; 0 disables.
    #[arg(long, default_value_t = 10_000)]
    period: usize,

    /// Round synchroniser.
    #[arg(long, value_enum, default_value_t = SyncArg::Spinner)]
    sync: SyncArg,

    /// Thread-id permutation between worker respawns.
    #[arg(long, value_enum, default_value_t = PermuteArg::Random)]
    permute: PermuteArg,

    /// Seed for the permutation; omit to seed from entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Abort the run after this many seconds of wall-clock time.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit the report as JSON instead of a histogram.
    #[arg(long)]
    json: bool,

    /// List the built-in tests and exit.
    #[arg(long)]
    list: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SyncArg {
    Spinner,
    Barrier,
}

impl From<SyncArg> for SyncStrategy {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::Spinner => Self::Spinner,
            SyncArg::Barrier => Self::Barrier,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PermuteArg {
    Random,
    None,
}

impl From<PermuteArg> for PermuteStrategy {
    fn from(arg: PermuteArg) -> Self {
        match arg {
            PermuteArg::Random => Self::Random,
            PermuteArg::None => Self::Ordered,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("no test named; pass a test name or --list")]
    MissingTest,

    #[error("unknown test {0:?}; --list shows the built-in tests")]
    UnknownTest(String),

    #[error(transparent)]
    Harness(#[from] litmus_harness::HarnessError),

    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match run(cli) {
        Ok(Some(Outcome::Forbidden)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<Outcome>, CliError> {
    if cli.list {
        for name in litmus_suite::NAMES {
            let blurb = litmus_suite::describe(name).unwrap_or("");
            println!("{name:<8}{blurb}");
        }
        return Ok(None);
    }

    let name = cli.test.as_deref().ok_or(CliError::MissingTest)?;
    let module = litmus_suite::by_name(name)
        .ok_or_else(|| CliError::UnknownTest(name.to_string()))?;

    let config = RunConfig {
        iterations: cli.iterations,
        rotation_period: cli.period,
        deadline: cli.timeout_secs.map(Duration::from_secs),
        sync: cli.sync.into(),
        permute: cli.permute.into(),
        seed: cli.seed,
    };
    let report = Runner::new(module, config)?.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_histogram(name, &report);
    }
    Ok(report.outcome)
}

/// One line per distinct state: occurrence count, `*` for allowed / `:` for
/// forbidden, the slot bindings, and the round the state first showed up in.
fn print_histogram(name: &str, report: &Report) {
    for state in &report.states {
        let sigil = match state.info.outcome {
            Outcome::Allowed => '*',
            Outcome::Forbidden => ':',
        };
        let bindings = state
            .bindings
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{occurs:>10} {sigil} {bindings}  (first seen {first})",
            occurs = state.info.occurs,
            first = state.info.first_seen,
        );
    }
    match report.outcome {
        Some(outcome) => println!(
            "{name}: {outcome} ({iters} iterations, {distinct} distinct states)",
            iters = report.iterations,
            distinct = report.states.len(),
        ),
        None => println!("{name}: no states observed"),
    }
}
