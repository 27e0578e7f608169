use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tuning parameters for the gross-up fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Multiplier applied to the desired net to get the first gross estimate.
    pub initial_markup: Decimal,

    /// The solver stops once `|desired - computed net|` is strictly below this.
    pub tolerance: Decimal,

    /// Iteration budget.
    pub max_iterations: u32,

    /// Growth applied to the estimate when it yields a non-positive net.
    pub fallback_growth: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_markup: Decimal::new(14, 1),
            tolerance: Decimal::new(1, 2),
            max_iterations: 100,
            fallback_growth: Decimal::new(11, 1),
        }
    }
}
