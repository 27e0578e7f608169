//! Built-in rate table history and date-based table selection.
//!
//! The contribution schedule is revised every January when the minimum wage
//! changes. The withholding rate, dependent allowance, employer charges,
//! provisions and bonus shares have not changed over the covered years.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    BonusShares, ContributionBracket, EmployerChargeRates, ProvisionRates, RateTable,
    RateTableError,
};

/// Effective flat withholding rate used for domestic payroll.
const WITHHOLDING_RATE: Decimal = Decimal::from_parts(2551, 0, 0, false, 4);

/// Monthly withholding allowance per dependent.
const DEPENDENT_ALLOWANCE: Decimal = Decimal::from_parts(18959, 0, 0, false, 2);

fn bracket(
    ceiling: Decimal,
    rate: Decimal,
) -> ContributionBracket {
    ContributionBracket { ceiling, rate }
}

fn schedule(ceilings: [Decimal; 4]) -> Vec<ContributionBracket> {
    let rates = [
        Decimal::new(75, 3),
        Decimal::new(9, 2),
        Decimal::new(12, 2),
        Decimal::new(14, 2),
    ];
    ceilings
        .into_iter()
        .zip(rates)
        .map(|(ceiling, rate)| bracket(ceiling, rate))
        .collect()
}

fn table(
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    ceilings: [Decimal; 4],
) -> RateTable {
    RateTable {
        valid_from,
        valid_until,
        contribution_brackets: schedule(ceilings),
        withholding_rate: WITHHOLDING_RATE,
        dependent_allowance: DEPENDENT_ALLOWANCE,
        employer_charges: EmployerChargeRates::default(),
        provisions: ProvisionRates::default(),
        bonus: BonusShares::default(),
    }
}

fn ymd(
    year: i32,
    month: u32,
    day: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Returns the built-in rate tables, oldest first.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::builtin_tables;
///
/// let tables = builtin_tables();
/// let latest = tables.last().unwrap();
///
/// assert_eq!(latest.contribution_brackets[0].ceiling, dec!(1518.00));
/// assert_eq!(latest.withholding_rate, dec!(0.2551));
/// ```
pub fn builtin_tables() -> Vec<RateTable> {
    vec![
        table(
            ymd(2023, 1, 1),
            ymd(2023, 12, 31),
            [
                Decimal::new(130200, 2),
                Decimal::new(257129, 2),
                Decimal::new(385694, 2),
                Decimal::new(750749, 2),
            ],
        ),
        table(
            ymd(2024, 1, 1),
            ymd(2024, 12, 31),
            [
                Decimal::new(141200, 2),
                Decimal::new(266668, 2),
                Decimal::new(400003, 2),
                Decimal::new(778602, 2),
            ],
        ),
        table(
            ymd(2025, 1, 1),
            ymd(2026, 12, 31),
            [
                Decimal::new(151800, 2),
                Decimal::new(279388, 2),
                Decimal::new(419083, 2),
                Decimal::new(815741, 2),
            ],
        ),
    ]
}

/// Checks that no two tables cover the same date.
///
/// # Errors
///
/// Returns [`RateTableError::OverlappingWindows`] for the first pair, in
/// `valid_from` order, whose windows intersect.
///
/// # Example
///
/// ```
/// use payroll_core::{RateTableError, builtin_tables, check_windows};
///
/// let mut tables = builtin_tables();
/// assert_eq!(check_windows(&tables), Ok(()));
///
/// tables[0].valid_until = tables[1].valid_from;
/// assert_eq!(
///     check_windows(&tables),
///     Err(RateTableError::OverlappingWindows {
///         earlier: tables[0].valid_from,
///         later: tables[1].valid_from,
///     })
/// );
/// ```
pub fn check_windows(tables: &[RateTable]) -> Result<(), RateTableError> {
    let mut ordered: Vec<&RateTable> = tables.iter().collect();
    ordered.sort_by_key(|t| t.valid_from);

    for pair in ordered.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        if later.valid_from <= earlier.valid_until {
            return Err(RateTableError::OverlappingWindows {
                earlier: earlier.valid_from,
                later: later.valid_from,
            });
        }
    }

    Ok(())
}

/// Selects the rate table in force on `date`.
///
/// Dates after the newest table fall back to the newest table and dates before
/// the oldest fall back to the oldest; both cases log a warning so stale
/// tables get noticed.
///
/// # Errors
///
/// - [`RateTableError::NoTables`] if `tables` is empty.
/// - [`RateTableError::NoTableForDate`] if `date` falls in a gap between windows.
pub fn table_for_date(
    tables: &[RateTable],
    date: NaiveDate,
) -> Result<&RateTable, RateTableError> {
    if let Some(exact) = tables.iter().find(|t| t.covers(date)) {
        return Ok(exact);
    }

    let newest = tables
        .iter()
        .max_by_key(|t| t.valid_from)
        .ok_or(RateTableError::NoTables)?;
    if date > newest.valid_until {
        warn!(
            %date,
            fallback = %newest.valid_from,
            "no rate table for date; using the newest table, update the rate tables"
        );
        return Ok(newest);
    }

    let oldest = tables
        .iter()
        .min_by_key(|t| t.valid_from)
        .ok_or(RateTableError::NoTables)?;
    if date < oldest.valid_from {
        warn!(
            %date,
            fallback = %oldest.valid_from,
            "no rate table for date; using the oldest table"
        );
        return Ok(oldest);
    }

    Err(RateTableError::NoTableForDate(date))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn builtin_tables_are_valid() {
        for table in builtin_tables() {
            assert_eq!(table.validate(), Ok(()), "table {}", table.valid_from);
        }
    }

    #[test]
    fn builtin_tables_have_expected_windows() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        let windows: Vec<(NaiveDate, NaiveDate)> = builtin_tables()
            .iter()
            .map(|t| (t.valid_from, t.valid_until))
            .collect();

        assert_eq!(
            windows,
            vec![
                (date(2023, 1, 1), date(2023, 12, 31)),
                (date(2024, 1, 1), date(2024, 12, 31)),
                (date(2025, 1, 1), date(2026, 12, 31)),
            ]
        );
    }

    #[test]
    fn builtin_constants_have_expected_values() {
        assert_eq!(WITHHOLDING_RATE, dec!(0.2551));
        assert_eq!(DEPENDENT_ALLOWANCE, dec!(189.59));
    }

    #[test]
    fn selects_exact_table() {
        let tables = builtin_tables();

        let table = table_for_date(&tables, ymd(2024, 6, 15)).unwrap();

        assert_eq!(table.valid_from, ymd(2024, 1, 1));
        assert_eq!(table.contribution_brackets[3].ceiling, dec!(7786.02));
    }

    #[test]
    fn selects_2025_table_for_january_2025() {
        let tables = builtin_tables();

        let table = table_for_date(&tables, ymd(2025, 1, 1)).unwrap();

        assert_eq!(table.contribution_brackets[1].ceiling, dec!(2793.88));
    }

    #[test]
    fn falls_back_to_newest_for_future_dates() {
        let _guard = init_test_tracing();
        let tables = builtin_tables();

        let table = table_for_date(&tables, ymd(2030, 3, 1)).unwrap();

        assert_eq!(table.valid_from, ymd(2025, 1, 1));
    }

    #[test]
    fn falls_back_to_oldest_for_past_dates() {
        let _guard = init_test_tracing();
        let tables = builtin_tables();

        let table = table_for_date(&tables, ymd(2019, 3, 1)).unwrap();

        assert_eq!(table.valid_from, ymd(2023, 1, 1));
    }

    #[test]
    fn reports_gap_between_windows() {
        let mut tables = builtin_tables();
        tables.remove(1);

        let result = table_for_date(&tables, ymd(2024, 6, 1));

        assert_eq!(result, Err(RateTableError::NoTableForDate(ymd(2024, 6, 1))));
    }

    #[test]
    fn empty_history_is_an_error() {
        let result = table_for_date(&[], ymd(2025, 1, 1));

        assert_eq!(result, Err(RateTableError::NoTables));
    }

    // =========================================================================
    // check_windows tests
    // =========================================================================

    #[test]
    fn builtin_windows_do_not_overlap() {
        assert_eq!(check_windows(&builtin_tables()), Ok(()));
    }

    #[test]
    fn overlapping_windows_are_rejected_regardless_of_order() {
        let mut tables = builtin_tables();
        tables[1].valid_from = ymd(2023, 7, 1);
        tables.reverse();

        assert_eq!(
            check_windows(&tables),
            Err(RateTableError::OverlappingWindows {
                earlier: ymd(2023, 1, 1),
                later: ymd(2023, 7, 1),
            })
        );
    }

    #[test]
    fn shared_boundary_day_is_an_overlap() {
        let mut tables = builtin_tables();
        tables[1].valid_from = ymd(2023, 12, 31);

        assert_eq!(
            check_windows(&tables),
            Err(RateTableError::OverlappingWindows {
                earlier: ymd(2023, 1, 1),
                later: ymd(2023, 12, 31),
            })
        );
    }
}
