mod contribution_bracket;
mod rate_table;
mod solver_config;

pub use contribution_bracket::ContributionBracket;
pub use rate_table::{BonusShares, EmployerChargeRates, ProvisionRates, RateTable, RateTableError};
pub use solver_config::SolverConfig;
