//! Bonus apportionment.
//!
//! The bonus returns to the employee the whole severance fund total plus half
//! of every other charge and deduction on the payslip (employer social
//! security, accident insurance, employee contribution, withholding and
//! provisions). The shares come from [`BonusShares`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::BonusShares;
use crate::calculations::common::percent_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusApportionment {
    /// Severance deposit plus penalty reserve.
    pub severance_total: Decimal,
    pub severance_component: Decimal,

    /// Sum of the remaining charges and deductions.
    pub other_charges: Decimal,
    pub other_charges_component: Decimal,

    pub total: Decimal,
    pub percent_of_gross: Decimal,
}

impl BonusApportionment {
    /// Splits the bonus between the two charge groups.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::BonusShares;
    /// use payroll_core::calculations::BonusApportionment;
    ///
    /// let bonus = BonusApportionment::calculate(
    ///     dec!(112.00),  // severance total
    ///     dec!(600.00),  // other charges
    ///     dec!(1000.00), // gross
    ///     &BonusShares::default(),
    /// );
    ///
    /// assert_eq!(bonus.total, dec!(412.00));
    /// assert_eq!(bonus.percent_of_gross, dec!(41.2));
    /// ```
    pub fn calculate(
        severance_total: Decimal,
        other_charges: Decimal,
        gross: Decimal,
        shares: &BonusShares,
    ) -> Self {
        let severance_component = severance_total * shares.severance_share;
        let other_charges_component = other_charges * shares.other_charges_share;
        let total = severance_component + other_charges_component;

        Self {
            severance_total,
            severance_component,
            other_charges,
            other_charges_component,
            total,
            percent_of_gross: percent_of(total, gross),
        }
    }
}
