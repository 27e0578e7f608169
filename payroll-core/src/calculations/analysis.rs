//! Complete payroll analysis for one net salary target.
//!
//! Runs the gross-up solver and derives every charge, provision and the bonus
//! from the solved gross salary. The result is plain data, ready to be
//! rendered or serialized.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{SolverConfig, builtin_tables};
//! use payroll_core::calculations::{AnalysisRequest, PayrollAnalysis};
//! use payroll_core::calculations::common::round_half_up;
//!
//! let tables = builtin_tables();
//! let request = AnalysisRequest { desired_net: dec!(3000.00), dependents: 0 };
//!
//! let analysis = PayrollAnalysis::run(&request, &tables[2], SolverConfig::default()).unwrap();
//!
//! assert!(analysis.converged);
//! assert_eq!(round_half_up(analysis.bonus.total), dec!(1947.34));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::percent_of;
use crate::calculations::{
    BonusApportionment, ContributionBreakdown, ContributionCalculator, EmployerCharges,
    GrossUpError, GrossUpSolver, Provisions, WithholdingCalculator,
};
use crate::{RateTable, RateTableError, SolverConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid rate table: {0}")]
    RateTable(#[from] RateTableError),

    #[error("gross-up failed: {0}")]
    GrossUp(#[from] GrossUpError),
}

/// The two inputs of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub desired_net: Decimal,
    pub dependents: u32,
}

/// Selected amounts as a percentage of gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossPercentages {
    pub employee_contribution: Decimal,
    pub withholding: Decimal,
    pub net: Decimal,
    pub provisions: Decimal,
    pub employer_total_charges: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollAnalysis {
    pub request: AnalysisRequest,

    /// `false` when the solver ran out of iterations; every amount below is
    /// then derived from its last estimate.
    pub converged: bool,
    pub iterations: u32,

    pub gross: Decimal,
    pub employee_contribution: ContributionBreakdown,
    pub withholding_base: Decimal,
    pub withholding: Decimal,
    pub net: Decimal,

    /// `desired_net - net`.
    pub net_difference: Decimal,

    pub employer_charges: EmployerCharges,
    pub provisions: Provisions,
    pub bonus: BonusApportionment,

    /// Employer charges plus provisions.
    pub employer_total_charges: Decimal,

    /// Gross plus employer charges, less the bonus.
    pub employer_total_cost: Decimal,

    /// Amount due on the combined monthly payment slip: employer charges
    /// plus the employee contribution and withholding.
    pub guide_total: Decimal,

    pub percentages: GrossPercentages,
}

impl PayrollAnalysis {
    /// Runs the full analysis against `table`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::RateTable`] if `table` fails validation.
    /// - [`AnalysisError::GrossUp`] if the target or solver config is invalid.
    pub fn run(
        request: &AnalysisRequest,
        table: &RateTable,
        config: SolverConfig,
    ) -> Result<Self, AnalysisError> {
        table.validate()?;

        let outcome =
            GrossUpSolver::new(table, config).solve(request.desired_net, request.dependents)?;
        let converged = outcome.is_converged();
        let solved = outcome.into_result();
        let gross = solved.gross;

        debug!(%gross, converged, "deriving charges from solved gross");

        let employee_contribution =
            ContributionCalculator::new(&table.contribution_brackets).breakdown(gross);
        let withholding_base = WithholdingCalculator::from_rate_table(table).taxable_base(
            gross,
            solved.employee_contribution,
            request.dependents,
        );

        let employer_charges = EmployerCharges::calculate(gross, &table.employer_charges);
        let provisions = Provisions::calculate(gross, &table.provisions);

        let other_charges = employer_charges.social_security
            + employer_charges.accident_insurance
            + solved.employee_contribution
            + solved.withholding
            + provisions.total;
        let bonus = BonusApportionment::calculate(
            employer_charges.severance_total(),
            other_charges,
            gross,
            &table.bonus,
        );

        let employer_total_charges = employer_charges.total() + provisions.total;
        let employer_total_cost = gross + employer_total_charges - bonus.total;
        let guide_total =
            employer_charges.total() + solved.employee_contribution + solved.withholding;

        let percentages = GrossPercentages {
            employee_contribution: percent_of(solved.employee_contribution, gross),
            withholding: percent_of(solved.withholding, gross),
            net: percent_of(solved.net, gross),
            provisions: percent_of(provisions.total, gross),
            employer_total_charges: percent_of(employer_total_charges, gross),
        };

        Ok(Self {
            request: *request,
            converged,
            iterations: solved.iterations,
            gross,
            employee_contribution,
            withholding_base,
            withholding: solved.withholding,
            net: solved.net,
            net_difference: request.desired_net - solved.net,
            employer_charges,
            provisions,
            bonus,
            employer_total_charges,
            employer_total_cost,
            guide_total,
            percentages,
        })
    }
}
