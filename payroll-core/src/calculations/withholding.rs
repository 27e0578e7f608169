//! Flat-rate income tax withholding.
//!
//! The withholding base is the gross salary minus the employee contribution
//! and a fixed allowance per dependent. A single rate applies to that base.

use rust_decimal::Decimal;

use crate::RateTable;

/// Calculator for the employee's income tax withholding.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::WithholdingCalculator;
///
/// let calculator = WithholdingCalculator::new(dec!(0.2551), dec!(189.59));
///
/// // (4000.00 - 400.00 - 1 x 189.59) x 25.51%
/// let withheld = calculator.calculate(dec!(4000.00), dec!(400.00), 1);
///
/// assert_eq!(withheld, dec!(869.995591));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithholdingCalculator {
    rate: Decimal,
    dependent_allowance: Decimal,
}

impl WithholdingCalculator {
    pub fn new(
        rate: Decimal,
        dependent_allowance: Decimal,
    ) -> Self {
        Self {
            rate,
            dependent_allowance,
        }
    }

    pub fn from_rate_table(table: &RateTable) -> Self {
        Self::new(table.withholding_rate, table.dependent_allowance)
    }

    /// Gross minus the employee contribution and the dependent allowances.
    ///
    /// May be negative; [`calculate`](Self::calculate) treats that as no tax.
    /// The dependent deduction saturates instead of overflowing.
    pub fn taxable_base(
        &self,
        gross: Decimal,
        employee_contribution: Decimal,
        dependents: u32,
    ) -> Decimal {
        let allowances = Decimal::from(dependents).saturating_mul(self.dependent_allowance);
        (gross - employee_contribution).saturating_sub(allowances)
    }

    /// Returns the amount withheld, never negative.
    pub fn calculate(
        &self,
        gross: Decimal,
        employee_contribution: Decimal,
        dependents: u32,
    ) -> Decimal {
        let base = self.taxable_base(gross, employee_contribution, dependents);
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        (base * self.rate).max(Decimal::ZERO)
    }
}
