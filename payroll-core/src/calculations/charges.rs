//! Employer-side charges and monthly accrual provisions.
//!
//! Every amount here is a direct function of the gross salary; there is no
//! state and no failure mode.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EmployerChargeRates, ProvisionRates};

/// Monthly charges the employer pays on top of the gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCharges {
    pub social_security: Decimal,
    pub accident_insurance: Decimal,
    pub severance_deposit: Decimal,
    pub severance_penalty: Decimal,
}

impl EmployerCharges {
    /// Applies each employer rate to `gross`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::EmployerChargeRates;
    /// use payroll_core::calculations::EmployerCharges;
    ///
    /// let charges = EmployerCharges::calculate(dec!(1000.00), &EmployerChargeRates::default());
    ///
    /// assert_eq!(charges.social_security, dec!(80.00));
    /// assert_eq!(charges.severance_total(), dec!(112.00));
    /// ```
    pub fn calculate(
        gross: Decimal,
        rates: &EmployerChargeRates,
    ) -> Self {
        Self {
            social_security: gross * rates.social_security,
            accident_insurance: gross * rates.accident_insurance,
            severance_deposit: gross * rates.severance_deposit,
            severance_penalty: gross * rates.severance_penalty,
        }
    }

    /// Severance fund deposit plus penalty reserve.
    pub fn severance_total(&self) -> Decimal {
        self.severance_deposit + self.severance_penalty
    }

    /// Every employer charge in this struct.
    pub fn total(&self) -> Decimal {
        self.social_security + self.accident_insurance + self.severance_total()
    }
}

/// Monthly accruals for future entitlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provisions {
    /// One month of the yearly thirteenth salary.
    pub thirteenth_salary: Decimal,

    /// One month of the yearly vacation pay.
    pub vacation: Decimal,

    /// One month of the constitutional vacation bonus (a third of vacation pay).
    pub vacation_bonus: Decimal,

    /// Sum of the three accruals before the multiplier.
    pub base_total: Decimal,

    /// `base_total × multiplier`.
    pub total: Decimal,
}

impl Provisions {
    /// Computes the accruals on `gross`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::ProvisionRates;
    /// use payroll_core::calculations::Provisions;
    ///
    /// let provisions = Provisions::calculate(dec!(3600.00), &ProvisionRates::default());
    ///
    /// // 300 + 300 + 100, then x 1.2
    /// assert_eq!(provisions.base_total, dec!(700.00));
    /// assert_eq!(provisions.total, dec!(840.00));
    /// ```
    pub fn calculate(
        gross: Decimal,
        rates: &ProvisionRates,
    ) -> Self {
        let thirteenth_salary = gross / rates.months_per_year;
        let vacation = gross / rates.months_per_year;
        let vacation_bonus = gross / rates.vacation_bonus_divisor / rates.months_per_year;
        let base_total = thirteenth_salary + vacation_bonus + vacation;

        Self {
            thirteenth_salary,
            vacation,
            vacation_bonus,
            base_total,
            total: base_total * rates.multiplier,
        }
    }
}
