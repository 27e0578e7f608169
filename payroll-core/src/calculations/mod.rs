//! Payroll calculation modules.
//!
//! The pipeline runs the gross-up solver first and then derives every other
//! amount from the solved gross salary:
//!
//! 1. [`contribution`]: progressive employee contribution.
//! 2. [`withholding`]: flat-rate income tax withholding.
//! 3. [`gross_up`]: fixed-point search for the gross that yields a target net.
//! 4. [`charges`]: employer charges and accrual provisions.
//! 5. [`bonus`]: bonus apportionment.
//! 6. [`analysis`]: all of the above in one serializable result.

pub mod analysis;
pub mod bonus;
pub mod charges;
pub mod common;
pub mod contribution;
pub mod gross_up;
pub mod withholding;

pub use analysis::{AnalysisError, AnalysisRequest, PayrollAnalysis};
pub use bonus::BonusApportionment;
pub use charges::{EmployerCharges, Provisions};
pub use contribution::{BracketSlice, ContributionBreakdown, ContributionCalculator};
pub use gross_up::{GrossUpError, GrossUpOutcome, GrossUpResult, GrossUpSolver, MAX_GROSS};
pub use withholding::WithholdingCalculator;
