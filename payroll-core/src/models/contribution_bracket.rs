use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the progressive employee contribution schedule.
///
/// The band starts where the previous one ends (zero for the first band) and
/// runs up to `ceiling`. Income above the last ceiling is not charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBracket {
    pub ceiling: Decimal,
    pub rate: Decimal,
}
