//! Budget variance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Spent less than allocated.
    Favorable,
    /// Spent more than allocated.
    Unfavorable,
    /// Spent exactly the allocation.
    OnBudget,
}

/// Allocated vs. spent comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Allocated amount.
    pub allocated: Decimal,
    /// Spent amount.
    pub spent: Decimal,
    /// `allocated - spent`.
    pub variance: Decimal,
    /// `variance / allocated * 100`, 2 dp; zero when nothing is allocated.
    pub variance_percent: Decimal,
    /// `spent / allocated * 100`, 2 dp; zero when nothing is allocated.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

impl VarianceResult {
    /// Compares an allocation with what was spent against it.
    #[must_use]
    pub fn calculate(allocated: Decimal, spent: Decimal) -> Self {
        let variance = allocated - spent;

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        Self {
            allocated,
            spent,
            variance,
            variance_percent: percent_of(variance, allocated),
            utilization_percent: percent_of(spent, allocated),
            status,
        }
    }
}

/// `part / whole * 100` rounded to 2 dp, or zero if `whole` is zero.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
