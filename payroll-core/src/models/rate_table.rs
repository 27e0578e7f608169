use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ContributionBracket;

/// Errors raised when a rate table is malformed or cannot be selected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    /// No rate tables were supplied at all.
    #[error("no rate tables available")]
    NoTables,

    /// The date falls in a gap between two tables' validity windows.
    #[error("no rate table covers {0}")]
    NoTableForDate(NaiveDate),

    /// The contribution schedule is empty.
    #[error("contribution schedule has no brackets")]
    NoBrackets,

    /// A bracket ceiling is zero or negative.
    #[error("bracket {index} ceiling must be positive, got {ceiling}")]
    NonPositiveCeiling { index: usize, ceiling: Decimal },

    /// Bracket ceilings must be strictly increasing.
    #[error("bracket {index} ceiling {ceiling} does not exceed the previous ceiling {previous}")]
    NonIncreasingCeiling {
        index: usize,
        ceiling: Decimal,
        previous: Decimal,
    },

    /// A bracket rate lies outside `[0, 1]`.
    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    /// The flat withholding rate lies outside `[0, 1]`.
    #[error("withholding rate must be between 0 and 1, got {0}")]
    InvalidWithholdingRate(Decimal),

    /// The per-dependent allowance is negative.
    #[error("dependent allowance must be non-negative, got {0}")]
    NegativeDependentAllowance(Decimal),

    /// An employer charge rate lies outside `[0, 1]`.
    #[error("{name} rate must be between 0 and 1, got {rate}")]
    InvalidChargeRate { name: &'static str, rate: Decimal },

    /// A provision parameter lies outside `[1, 100]`.
    #[error("provision {name} must be between 1 and 100, got {value}")]
    InvalidProvisionParameter { name: &'static str, value: Decimal },

    /// A bonus share lies outside `[0, 1]`.
    #[error("bonus {name} must be between 0 and 1, got {share}")]
    InvalidBonusShare { name: &'static str, share: Decimal },

    /// The validity window ends before it starts.
    #[error("validity window {from} .. {until} is empty")]
    InvalidValidityWindow { from: NaiveDate, until: NaiveDate },

    /// Two tables cover the same date.
    #[error("rate table valid from {later} overlaps the table valid from {earlier}")]
    OverlappingWindows { earlier: NaiveDate, later: NaiveDate },
}

/// Employer-side charges, each a flat fraction of gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerChargeRates {
    /// Employer social security contribution (8%).
    pub social_security: Decimal,

    /// Workplace accident insurance (0.8%).
    pub accident_insurance: Decimal,

    /// Monthly severance fund deposit (8%).
    pub severance_deposit: Decimal,

    /// Reserve for the severance fund dismissal penalty (3.2%).
    pub severance_penalty: Decimal,
}

impl Default for EmployerChargeRates {
    fn default() -> Self {
        Self {
            social_security: Decimal::new(8, 2),
            accident_insurance: Decimal::new(8, 3),
            severance_deposit: Decimal::new(8, 2),
            severance_penalty: Decimal::new(32, 3),
        }
    }
}

/// Parameters of the monthly accrual provisions.
///
/// The thirteenth salary and the vacation pay each accrue `gross / months_per_year`
/// per month, the vacation bonus accrues `gross / vacation_bonus_divisor / months_per_year`,
/// and the sum is scaled by `multiplier` to cover the charges levied on them.
/// Each parameter must lie in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRates {
    pub months_per_year: Decimal,
    pub vacation_bonus_divisor: Decimal,
    pub multiplier: Decimal,
}

impl Default for ProvisionRates {
    fn default() -> Self {
        Self {
            months_per_year: Decimal::from(12),
            vacation_bonus_divisor: Decimal::from(3),
            multiplier: Decimal::new(12, 1),
        }
    }
}

/// How much of each charge group is paid back to the employee as bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusShares {
    /// Share of the severance fund total (deposit + penalty).
    pub severance_share: Decimal,

    /// Share of the remaining charges and deductions.
    pub other_charges_share: Decimal,
}

impl Default for BonusShares {
    fn default() -> Self {
        Self {
            severance_share: Decimal::ONE,
            other_charges_share: Decimal::new(5, 1),
        }
    }
}

/// Every rate needed to run one payroll analysis, valid over a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,

    /// Progressive employee contribution schedule, ascending by ceiling.
    pub contribution_brackets: Vec<ContributionBracket>,

    /// Flat rate applied to the withholding base.
    pub withholding_rate: Decimal,

    /// Amount subtracted from the withholding base per dependent.
    pub dependent_allowance: Decimal,

    #[serde(default)]
    pub employer_charges: EmployerChargeRates,

    #[serde(default)]
    pub provisions: ProvisionRates,

    #[serde(default)]
    pub bonus: BonusShares,
}

impl RateTable {
    /// Returns `true` if `date` falls inside this table's validity window.
    pub fn covers(
        &self,
        date: NaiveDate,
    ) -> bool {
        date >= self.valid_from && date <= self.valid_until
    }

    /// Validates every rate in the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found, checking the validity window,
    /// the contribution schedule, the withholding parameters, employer charges,
    /// provisions and bonus shares in that order.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::{RateTableError, builtin_tables};
    ///
    /// let mut table = builtin_tables().remove(0);
    /// table.withholding_rate = dec!(1.5);
    ///
    /// assert_eq!(
    ///     table.validate(),
    ///     Err(RateTableError::InvalidWithholdingRate(dec!(1.5)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.valid_until < self.valid_from {
            return Err(RateTableError::InvalidValidityWindow {
                from: self.valid_from,
                until: self.valid_until,
            });
        }

        self.validate_brackets()?;

        if !is_fraction(self.withholding_rate) {
            return Err(RateTableError::InvalidWithholdingRate(
                self.withholding_rate,
            ));
        }
        if self.dependent_allowance < Decimal::ZERO {
            return Err(RateTableError::NegativeDependentAllowance(
                self.dependent_allowance,
            ));
        }

        let charges = &self.employer_charges;
        for (name, rate) in [
            ("social security", charges.social_security),
            ("accident insurance", charges.accident_insurance),
            ("severance deposit", charges.severance_deposit),
            ("severance penalty", charges.severance_penalty),
        ] {
            if !is_fraction(rate) {
                return Err(RateTableError::InvalidChargeRate { name, rate });
            }
        }

        let provisions = &self.provisions;
        for (name, value) in [
            ("months per year", provisions.months_per_year),
            ("vacation bonus divisor", provisions.vacation_bonus_divisor),
            ("multiplier", provisions.multiplier),
        ] {
            if value < Decimal::ONE || value > Decimal::ONE_HUNDRED {
                return Err(RateTableError::InvalidProvisionParameter { name, value });
            }
        }

        for (name, share) in [
            ("severance share", self.bonus.severance_share),
            ("other charges share", self.bonus.other_charges_share),
        ] {
            if !is_fraction(share) {
                return Err(RateTableError::InvalidBonusShare { name, share });
            }
        }

        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), RateTableError> {
        if self.contribution_brackets.is_empty() {
            return Err(RateTableError::NoBrackets);
        }

        let mut previous = Decimal::ZERO;
        for (index, bracket) in self.contribution_brackets.iter().enumerate() {
            if bracket.ceiling <= Decimal::ZERO {
                return Err(RateTableError::NonPositiveCeiling {
                    index,
                    ceiling: bracket.ceiling,
                });
            }
            if index > 0 && bracket.ceiling <= previous {
                return Err(RateTableError::NonIncreasingCeiling {
                    index,
                    ceiling: bracket.ceiling,
                    previous,
                });
            }
            if !is_fraction(bracket.rate) {
                return Err(RateTableError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            previous = bracket.ceiling;
        }

        Ok(())
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(
        year: i32,
        month: u32,
        day: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn test_table() -> RateTable {
        RateTable {
            valid_from: date(2025, 1, 1),
            valid_until: date(2025, 12, 31),
            contribution_brackets: vec![
                ContributionBracket {
                    ceiling: dec!(1518.00),
                    rate: dec!(0.075),
                },
                ContributionBracket {
                    ceiling: dec!(2793.88),
                    rate: dec!(0.09),
                },
            ],
            withholding_rate: dec!(0.2551),
            dependent_allowance: dec!(189.59),
            employer_charges: EmployerChargeRates::default(),
            provisions: ProvisionRates::default(),
            bonus: BonusShares::default(),
        }
    }

    // =========================================================================
    // defaults
    // =========================================================================

    #[test]
    fn employer_charge_defaults_match_statutory_rates() {
        let rates = EmployerChargeRates::default();

        assert_eq!(rates.social_security, dec!(0.08));
        assert_eq!(rates.accident_insurance, dec!(0.008));
        assert_eq!(rates.severance_deposit, dec!(0.08));
        assert_eq!(rates.severance_penalty, dec!(0.032));
    }

    #[test]
    fn provision_and_bonus_defaults() {
        assert_eq!(ProvisionRates::default().multiplier, dec!(1.2));
        assert_eq!(BonusShares::default().other_charges_share, dec!(0.5));
    }

    // =========================================================================
    // covers
    // =========================================================================

    #[test]
    fn covers_includes_both_window_ends() {
        let table = test_table();

        assert!(table.covers(date(2025, 1, 1)));
        assert!(table.covers(date(2025, 12, 31)));
        assert!(!table.covers(date(2026, 1, 1)));
        assert!(!table.covers(date(2024, 12, 31)));
    }

    // =========================================================================
    // validate
    // =========================================================================

    #[test]
    fn validate_accepts_valid_table() {
        assert_eq!(test_table().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        let table = RateTable {
            contribution_brackets: Vec::new(),
            ..test_table()
        };

        assert_eq!(table.validate(), Err(RateTableError::NoBrackets));
    }

    #[test]
    fn validate_rejects_non_increasing_ceilings() {
        let mut table = test_table();
        table.contribution_brackets[1].ceiling = dec!(1518.00);

        assert_eq!(
            table.validate(),
            Err(RateTableError::NonIncreasingCeiling {
                index: 1,
                ceiling: dec!(1518.00),
                previous: dec!(1518.00),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_ceiling() {
        let mut table = test_table();
        table.contribution_brackets[0].ceiling = dec!(0);

        assert_eq!(
            table.validate(),
            Err(RateTableError::NonPositiveCeiling {
                index: 0,
                ceiling: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_bracket_rate_above_one() {
        let mut table = test_table();
        table.contribution_brackets[1].rate = dec!(1.01);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidBracketRate {
                index: 1,
                rate: dec!(1.01),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_allowance() {
        let table = RateTable {
            dependent_allowance: dec!(-1),
            ..test_table()
        };

        assert_eq!(
            table.validate(),
            Err(RateTableError::NegativeDependentAllowance(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_negative_charge_rate() {
        let mut table = test_table();
        table.employer_charges.accident_insurance = dec!(-0.008);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidChargeRate {
                name: "accident insurance",
                rate: dec!(-0.008),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_provision_months() {
        let mut table = test_table();
        table.provisions.months_per_year = dec!(0);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidProvisionParameter {
                name: "months per year",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_oversized_provision_multiplier() {
        let mut table = test_table();
        table.provisions.multiplier = dec!(1000000);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidProvisionParameter {
                name: "multiplier",
                value: dec!(1000000),
            })
        );
    }

    #[test]
    fn validate_rejects_fractional_bonus_divisor() {
        let mut table = test_table();
        table.provisions.vacation_bonus_divisor = dec!(0.0000001);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidProvisionParameter {
                name: "vacation bonus divisor",
                value: dec!(0.0000001),
            })
        );
    }

    #[test]
    fn validate_rejects_bonus_share_above_one() {
        let mut table = test_table();
        table.bonus.severance_share = dec!(2);

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidBonusShare {
                name: "severance share",
                share: dec!(2),
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let table = RateTable {
            valid_from: date(2025, 6, 1),
            valid_until: date(2025, 5, 31),
            ..test_table()
        };

        assert_eq!(
            table.validate(),
            Err(RateTableError::InvalidValidityWindow {
                from: date(2025, 6, 1),
                until: date(2025, 5, 31),
            })
        );
    }
}
