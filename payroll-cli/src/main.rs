use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use payroll_cli::format::parse_decimal;
use payroll_cli::{OutputFormat, RunOptions, run};
use payroll_core::SolverConfig;
use payroll_core::calculations::AnalysisRequest;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Payroll gross-up calculator.
///
/// Finds the gross salary that yields the desired net salary after the
/// progressive employee contribution and flat withholding, then reports the
/// employer charges, provisions, bonus and total employer cost.
#[derive(Debug, Parser)]
#[command(name = "payroll-gross-up")]
struct Cli {
    /// Desired net monthly salary (e.g. `3,000.00`).
    #[arg(long, default_value = "3000.00", value_parser = parse_decimal)]
    net_salary: Decimal,

    /// Number of dependents claimed for withholding.
    #[arg(long, default_value_t = 0)]
    dependents: u32,

    /// Reference date used to select the rate table (YYYY-MM-DD).
    #[arg(long, default_value = "2025-01-01")]
    period: NaiveDate,

    /// TOML file with `[[tables]]` replacing the built-in rate tables.
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Solver stops when the achieved net is within this amount of the target.
    #[arg(long, default_value = "0.01", value_parser = parse_decimal)]
    tolerance: Decimal,

    /// Solver iteration budget.
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            request: AnalysisRequest {
                desired_net: self.net_salary,
                dependents: self.dependents,
            },
            period: self.period,
            rates: self.rates,
            format: self.format,
            solver: SolverConfig {
                tolerance: self.tolerance,
                max_iterations: self.max_iterations,
                ..SolverConfig::default()
            },
        }
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `warn` so the report is the only normal output.
/// * Writes to stderr, without timestamps or target names.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    let options = cli.into_options();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run(&options, &mut out)?;
    out.flush().context("flushing report")?;

    Ok(())
}
