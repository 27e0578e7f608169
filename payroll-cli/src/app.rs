use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use payroll_core::calculations::{AnalysisRequest, PayrollAnalysis};
use payroll_core::{SolverConfig, builtin_tables, table_for_date};

use crate::rates;
use crate::report::{TextReport, write_json};

/// Report format written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything one run needs, already parsed.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub request: AnalysisRequest,

    /// Reference date used to pick the rate table.
    pub period: NaiveDate,

    /// Rate file replacing the built-in tables.
    pub rates: Option<PathBuf>,

    pub format: OutputFormat,
    pub solver: SolverConfig,
}

/// Selects the rate table, runs the analysis and writes the report to `out`.
pub fn run<W: Write>(
    options: &RunOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let tables = match &options.rates {
        Some(path) => rates::load_from_file(path)
            .with_context(|| format!("loading rate tables from {}", path.display()))?,
        None => builtin_tables(),
    };

    let table = table_for_date(&tables, options.period)
        .with_context(|| format!("selecting a rate table for {}", options.period))?;
    info!(
        period = %options.period,
        valid_from = %table.valid_from,
        "using rate table"
    );

    let analysis = PayrollAnalysis::run(&options.request, table, options.solver)
        .with_context(|| {
            format!(
                "analysing a net salary of {}",
                options.request.desired_net
            )
        })?;

    match options.format {
        OutputFormat::Text => TextReport::new(&analysis, table)
            .render(out)
            .context("writing text report")?,
        OutputFormat::Json => write_json(&analysis, out).context("writing JSON report")?,
    }

    Ok(())
}
