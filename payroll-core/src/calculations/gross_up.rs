//! Gross-up solver: finds the gross salary that yields a desired net salary.
//!
//! # Algorithm
//!
//! The solver runs a proportional fixed-point iteration:
//!
//! 1. Start from `desired_net × initial_markup`.
//! 2. Compute the employee contribution and withholding for the estimate and
//!    the net salary they leave.
//! 3. Stop if `|desired_net − net| < tolerance`.
//! 4. Otherwise scale the estimate by `desired_net / net`, or by
//!    `fallback_growth` when the estimate leaves no positive net, and repeat.
//!
//! The iteration is bounded by `max_iterations`. Running out of budget is
//! reported as [`GrossUpOutcome::Exhausted`] rather than as an error so the
//! caller can still inspect the best estimate.
//!
//! Estimates are capped at [`MAX_GROSS`]. Every amount derived from an
//! evaluated estimate therefore stays far inside `Decimal` range.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{SolverConfig, builtin_tables};
//! use payroll_core::calculations::GrossUpSolver;
//! use payroll_core::calculations::common::round_half_up;
//!
//! let tables = builtin_tables();
//! let solver = GrossUpSolver::new(&tables[2], SolverConfig::default());
//!
//! let outcome = solver.solve(dec!(3000.00), 0).unwrap();
//!
//! assert!(outcome.is_converged());
//! assert_eq!(outcome.result().iterations, 5);
//! assert_eq!(round_half_up(outcome.result().gross), dec!(4461.61));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::{ContributionCalculator, WithholdingCalculator};
use crate::{RateTable, SolverConfig};

/// Largest gross estimate the solver will evaluate (one quadrillion).
pub const MAX_GROSS: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Errors that prevent the solver from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrossUpError {
    /// The desired net salary must be positive.
    #[error("desired net salary must be positive, got {0}")]
    NonPositiveTarget(Decimal),

    /// The desired net salary exceeds [`MAX_GROSS`].
    #[error("desired net salary {0} exceeds the supported maximum of {max}", max = MAX_GROSS)]
    TargetTooLarge(Decimal),

    /// A gross estimate left the supported range after `iteration` evaluations.
    #[error("gross estimate exceeded {max} after {iteration} iterations", max = MAX_GROSS)]
    Overflow { iteration: u32 },

    /// The tolerance must be positive.
    #[error("solver tolerance must be positive, got {0}")]
    InvalidTolerance(Decimal),

    /// At least one iteration is required.
    #[error("solver iteration budget must be at least 1")]
    ZeroIterationBudget,

    /// The initial markup must be positive.
    #[error("initial markup must be positive, got {0}")]
    InvalidInitialMarkup(Decimal),

    /// The fallback growth factor must be positive.
    #[error("fallback growth factor must be positive, got {0}")]
    InvalidFallbackGrowth(Decimal),
}

/// Amounts evaluated at one gross estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossUpResult {
    pub gross: Decimal,
    pub employee_contribution: Decimal,
    pub withholding: Decimal,
    /// `gross - employee_contribution - withholding`.
    pub net: Decimal,
    /// 1-based number of iterations consumed.
    pub iterations: u32,
}

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GrossUpOutcome {
    /// The net salary at `gross` is within tolerance of the target.
    Converged(GrossUpResult),

    /// The iteration budget ran out.
    ///
    /// `last` is the final evaluated estimate with its own amounts;
    /// `next_estimate` is what the update rule produced from it.
    Exhausted {
        last: GrossUpResult,
        next_estimate: Decimal,
    },
}

impl GrossUpOutcome {
    /// The last evaluated estimate, whether or not it converged.
    pub fn result(&self) -> &GrossUpResult {
        match self {
            Self::Converged(result) => result,
            Self::Exhausted { last, .. } => last,
        }
    }

    pub fn into_result(self) -> GrossUpResult {
        match self {
            Self::Converged(result) => result,
            Self::Exhausted { last, .. } => last,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

/// Fixed-point solver for the gross salary behind a target net salary.
#[derive(Debug, Clone)]
pub struct GrossUpSolver<'a> {
    contribution: ContributionCalculator<'a>,
    withholding: WithholdingCalculator,
    config: SolverConfig,
}

impl<'a> GrossUpSolver<'a> {
    pub fn new(
        table: &'a RateTable,
        config: SolverConfig,
    ) -> Self {
        Self {
            contribution: ContributionCalculator::new(&table.contribution_brackets),
            withholding: WithholdingCalculator::from_rate_table(table),
            config,
        }
    }

    /// Searches for the gross salary that leaves `desired_net` after the
    /// employee contribution and withholding.
    ///
    /// # Errors
    ///
    /// Returns [`GrossUpError`] if `desired_net` is zero or negative or if the
    /// solver configuration is unusable. Running out of iterations is not an
    /// error; see [`GrossUpOutcome::Exhausted`].
    pub fn solve(
        &self,
        desired_net: Decimal,
        dependents: u32,
    ) -> Result<GrossUpOutcome, GrossUpError> {
        self.validate(desired_net)?;

        let mut estimate = bounded(desired_net.checked_mul(self.config.initial_markup))
            .ok_or(GrossUpError::Overflow { iteration: 0 })?;
        let mut last = None;

        for iteration in 1..=self.config.max_iterations {
            let evaluated = self.evaluate(estimate, dependents, iteration);
            let difference = desired_net - evaluated.net;

            debug!(
                iteration,
                gross = %evaluated.gross,
                net = %evaluated.net,
                difference = %difference,
                "gross-up iteration"
            );

            if difference.abs() < self.config.tolerance {
                info!(
                    iterations = iteration,
                    gross = %evaluated.gross,
                    "gross-up converged"
                );
                return Ok(GrossUpOutcome::Converged(evaluated));
            }

            estimate = self
                .next_estimate(estimate, desired_net, evaluated.net)
                .ok_or(GrossUpError::Overflow { iteration })?;
            last = Some(evaluated);
        }

        // The budget is at least one iteration, so `last` is always set here.
        let last = last.ok_or(GrossUpError::ZeroIterationBudget)?;
        warn!(
            max_iterations = self.config.max_iterations,
            gross = %last.gross,
            net = %last.net,
            desired_net = %desired_net,
            "gross-up did not converge within the iteration budget"
        );

        Ok(GrossUpOutcome::Exhausted {
            last,
            next_estimate: estimate,
        })
    }

    fn validate(
        &self,
        desired_net: Decimal,
    ) -> Result<(), GrossUpError> {
        if desired_net <= Decimal::ZERO {
            return Err(GrossUpError::NonPositiveTarget(desired_net));
        }
        if desired_net > MAX_GROSS {
            return Err(GrossUpError::TargetTooLarge(desired_net));
        }
        if self.config.tolerance <= Decimal::ZERO {
            return Err(GrossUpError::InvalidTolerance(self.config.tolerance));
        }
        if self.config.max_iterations == 0 {
            return Err(GrossUpError::ZeroIterationBudget);
        }
        if self.config.initial_markup <= Decimal::ZERO {
            return Err(GrossUpError::InvalidInitialMarkup(
                self.config.initial_markup,
            ));
        }
        if self.config.fallback_growth <= Decimal::ZERO {
            return Err(GrossUpError::InvalidFallbackGrowth(
                self.config.fallback_growth,
            ));
        }
        Ok(())
    }

    /// Computes the deductions and net salary for one gross estimate.
    fn evaluate(
        &self,
        gross: Decimal,
        dependents: u32,
        iteration: u32,
    ) -> GrossUpResult {
        let employee_contribution = self.contribution.total(gross);
        let withholding = self
            .withholding
            .calculate(gross, employee_contribution, dependents);

        GrossUpResult {
            gross,
            employee_contribution,
            withholding,
            net: gross - employee_contribution - withholding,
            iterations: iteration,
        }
    }

    /// Proportional correction, or fixed growth when the net is not positive.
    ///
    /// Returns `None` when the new estimate would exceed [`MAX_GROSS`].
    fn next_estimate(
        &self,
        estimate: Decimal,
        desired_net: Decimal,
        computed_net: Decimal,
    ) -> Option<Decimal> {
        let factor = if computed_net > Decimal::ZERO {
            desired_net.checked_div(computed_net)?
        } else {
            self.config.fallback_growth
        };
        bounded(estimate.checked_mul(factor))
    }
}

fn bounded(estimate: Option<Decimal>) -> Option<Decimal> {
    estimate.filter(|gross| *gross <= MAX_GROSS)
}
