//! Progressive employee contribution.
//!
//! Each bracket's rate applies only to the part of the gross salary that falls
//! between the previous bracket's ceiling and its own. The schedule is capped:
//! salary above the last ceiling is not charged at all.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::ContributionBracket;
//! use payroll_core::calculations::ContributionCalculator;
//!
//! let brackets = vec![
//!     ContributionBracket { ceiling: dec!(1518.00), rate: dec!(0.075) },
//!     ContributionBracket { ceiling: dec!(2793.88), rate: dec!(0.09) },
//! ];
//!
//! let calculator = ContributionCalculator::new(&brackets);
//!
//! // 1518.00 x 7.5% + 482.00 x 9%
//! assert_eq!(calculator.total(dec!(2000.00)), dec!(157.23));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ContributionBracket;

/// The portion of gross salary charged inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    /// 1-based bracket number.
    pub number: usize,
    pub lower: Decimal,
    pub upper: Decimal,
    pub rate: Decimal,
    /// `upper - lower`.
    pub base: Decimal,
    /// `base * rate`.
    pub amount: Decimal,
}

/// Per-bracket view of a contribution, with its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// Only brackets with a positive base are listed.
    pub slices: Vec<BracketSlice>,
    pub total: Decimal,
}

/// Calculator for the progressive employee contribution.
#[derive(Debug, Clone)]
pub struct ContributionCalculator<'a> {
    brackets: &'a [ContributionBracket],
}

impl<'a> ContributionCalculator<'a> {
    /// Creates a calculator over a schedule sorted by ascending ceiling.
    pub fn new(brackets: &'a [ContributionBracket]) -> Self {
        Self { brackets }
    }

    /// Returns the total contribution due on `gross`.
    ///
    /// Zero for a zero or negative gross.
    pub fn total(
        &self,
        gross: Decimal,
    ) -> Decimal {
        self.breakdown(gross).total
    }

    /// Returns the contribution due on `gross` split by bracket.
    pub fn breakdown(
        &self,
        gross: Decimal,
    ) -> ContributionBreakdown {
        let mut slices = Vec::new();
        let mut total = Decimal::ZERO;

        if gross <= Decimal::ZERO {
            return ContributionBreakdown { slices, total };
        }

        let mut previous = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            let upper = bracket.ceiling.min(gross);
            let base = upper - previous;
            if base > Decimal::ZERO {
                let amount = base * bracket.rate;
                total += amount;
                slices.push(BracketSlice {
                    number: index + 1,
                    lower: previous,
                    upper,
                    rate: bracket.rate,
                    base,
                    amount,
                });
            }
            previous = upper;
        }

        ContributionBreakdown { slices, total }
    }
}
