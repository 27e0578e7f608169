//! End-to-end runs through `payroll_cli::run`, including rate tables loaded
//! from the on-disk fixtures.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use payroll_cli::rates::{self, RateFileError};
use payroll_cli::{OutputFormat, RunOptions, run};
use payroll_core::calculations::AnalysisRequest;
use payroll_core::{RateTableError, SolverConfig, builtin_tables};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn reference_options() -> RunOptions {
    RunOptions {
        request: AnalysisRequest {
            desired_net: dec!(3000.00),
            dependents: 0,
        },
        period: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        rates: None,
        format: OutputFormat::Text,
        solver: SolverConfig::default(),
    }
}

fn run_to_string(options: &RunOptions) -> String {
    let mut out = Vec::new();
    run(options, &mut out).expect("run should succeed");
    String::from_utf8(out).unwrap()
}

// =============================================================================
// Rate file fixtures
// =============================================================================

#[test]
fn fixture_rate_file_matches_builtin_2025_rates() {
    let tables = rates::load_from_file(&fixture_path("rates_2025.toml"))
        .expect("fixture file should load without error");
    let builtin = builtin_tables().remove(2);

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.contribution_brackets, builtin.contribution_brackets);
    assert_eq!(table.withholding_rate, builtin.withholding_rate);
    assert_eq!(table.dependent_allowance, builtin.dependent_allowance);
    assert_eq!(table.employer_charges, builtin.employer_charges);
    assert_eq!(table.provisions, builtin.provisions);
    assert_eq!(table.bonus, builtin.bonus);
}

#[test]
fn invalid_fixture_is_rejected_with_bracket_error() {
    let result = rates::load_from_file(&fixture_path("invalid_brackets.toml"));

    match result {
        Err(RateFileError::InvalidTable { source, .. }) => assert_eq!(
            source,
            RateTableError::NonIncreasingCeiling {
                index: 1,
                ceiling: dec!(1518.00),
                previous: dec!(2793.88),
            }
        ),
        other => panic!("expected InvalidTable, got {other:?}"),
    }
}

// =============================================================================
// Text report
// =============================================================================

#[test]
fn report_from_rate_file_matches_builtin_report() {
    let builtin = run_to_string(&reference_options());

    let mut options = reference_options();
    options.rates = Some(fixture_path("rates_2025.toml"));
    let from_file = run_to_string(&options);

    // Only the validity window in the header differs.
    let strip_header = |s: &str| {
        s.lines()
            .filter(|l| !l.starts_with("Rate table valid"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip_header(&from_file), strip_header(&builtin));
}

#[test]
fn reference_report_key_figures() {
    let report = run_to_string(&reference_options());

    assert!(report.contains("Result after 5 iterations:"));
    assert!(report.contains("  Required gross salary: R$ 4,461.61"));
    assert!(report.contains("    Total employee contribution: R$ 434.22"));
    assert!(report.contains("    Withholding = base x 25.51% = R$ 1,027.39"));
    assert!(report.contains("TOTAL BONUS: R$ 1,947.34 (43.65% of gross)"));
    assert!(report.contains("  = R$ 4,447.63"));
}

#[test]
fn report_ends_with_footer() {
    let report = run_to_string(&reference_options());

    let last: Vec<&str> = report.lines().rev().take(2).collect();
    assert_eq!(last[1], "END OF ANALYSIS");
}

#[test]
fn dependents_lower_the_required_gross() {
    let mut options = reference_options();
    options.request.dependents = 2;

    let report = run_to_string(&options);

    assert!(report.contains("  Required gross salary: R$ 4,310.61"));
}

#[test]
fn small_target_converges_quickly() {
    let mut options = reference_options();
    options.request.desired_net = dec!(1000.00);

    let report = run_to_string(&options);

    assert!(report.contains("Result after 2 iterations:"));
    assert!(report.contains("  Required gross salary: R$ 1,451.31"));
}

// =============================================================================
// JSON report and failures
// =============================================================================

#[test]
fn json_report_carries_the_solved_amounts() {
    let mut options = reference_options();
    options.format = OutputFormat::Json;

    let output = run_to_string(&options);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["converged"], serde_json::json!(true));
    assert!(value["gross"].as_str().unwrap().starts_with("4461.607"));
    assert!(value["bonus"]["total"].is_string());
}

#[test]
fn zero_net_salary_is_rejected() {
    let mut options = reference_options();
    options.request.desired_net = dec!(0);
    let mut out = Vec::new();

    let err = run(&options, &mut out).unwrap_err();

    assert!(format!("{err:#}").contains("desired net salary must be positive"));
}

#[test]
fn huge_net_salary_is_rejected_without_output() {
    let mut options = reference_options();
    options.request.desired_net =
        payroll_cli::format::parse_decimal("70,000,000,000,000,000,000,000,000,000").unwrap();
    let mut out = Vec::new();

    let err = run(&options, &mut out).unwrap_err();

    assert!(format!("{err:#}").contains("exceeds the supported maximum"));
    assert!(out.is_empty());
}

#[test]
fn fully_withheld_rate_file_reports_overflow() {
    let mut options = reference_options();
    options.rates = Some(fixture_path("fully_withheld.toml"));
    options.solver.max_iterations = 1000;
    let mut out = Vec::new();

    let err = run(&options, &mut out).unwrap_err();

    assert!(format!("{err:#}").contains("gross estimate exceeded"));
    assert!(out.is_empty());
}

#[test]
fn period_before_every_table_falls_back_to_oldest() {
    let mut options = reference_options();
    options.period = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    let report = run_to_string(&options);

    assert!(report.contains("Rate table valid 2023-01-01 to 2023-12-31"));
}
