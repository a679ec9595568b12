//! Budget data types.

use std::fmt;
use std::str::FromStr;

use budgetline_shared::types::{
    AccountId, AllocationId, BudgetId, BudgetPeriodId, OrganizationId, SnapshotId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use super::variance::VarianceResult;
use crate::ledger::{AccountTotals, NormalBalance};

/// Budget type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    /// Day-to-day running costs.
    Operational,
    /// Long-lived asset purchases.
    Capital,
    /// Cash in/out planning.
    CashFlow,
}

impl BudgetType {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Capital => "capital",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operational" => Ok(Self::Operational),
            "capital" => Ok(Self::Capital),
            "cash_flow" | "cash-flow" | "cashflow" => Ok(Self::CashFlow),
            _ => Err(BudgetError::InvalidBudgetType(s.to_string())),
        }
    }
}

/// A budget record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Period this budget belongs to.
    pub period_id: BudgetPeriodId,
    /// Budget name.
    pub name: String,
    /// Budget type.
    pub budget_type: BudgetType,
    /// Currency code.
    pub currency: String,
    /// Total amount available for allocation.
    pub total_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An amount earmarked for one ledger account within a budget.
///
/// After every recalculation `remaining_amount == allocated_amount - spent_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation ID.
    pub id: AllocationId,
    /// Parent budget.
    pub budget_id: BudgetId,
    /// Ledger account the allocation tracks.
    pub account_id: AccountId,
    /// Budgeted amount.
    pub allocated_amount: Decimal,
    /// Actual spend from posted ledger lines.
    pub spent_amount: Decimal,
    /// `allocated_amount - spent_amount`.
    pub remaining_amount: Decimal,
    /// When spend was last recomputed.
    pub last_calculated_at: Option<DateTime<Utc>>,
}

impl Allocation {
    /// Returns true if more was spent than allocated.
    #[must_use]
    pub fn is_overspent(&self) -> bool {
        self.spent_amount > self.allocated_amount
    }
}

/// Posted ledger activity for one account inside a budget period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountActivity {
    /// Normal-balance side of the account.
    pub normal_balance: NormalBalance,
    /// Debit and credit sums over posted lines in the period.
    pub totals: AccountTotals,
}

/// Aggregate allocation figures for a budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTotals {
    /// Sum of allocated amounts.
    pub allocated: Decimal,
    /// Sum of spent amounts.
    pub spent: Decimal,
    /// Sum of remaining amounts.
    pub remaining: Decimal,
    /// Number of allocations spent beyond their amount.
    pub overspent_allocations: u32,
}

/// Immutable point-in-time rollup of a budget, appended on every recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    /// Snapshot ID.
    pub id: SnapshotId,
    /// Budget the snapshot describes.
    pub budget_id: BudgetId,
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Sum of allocated amounts.
    pub total_allocated: Decimal,
    /// Sum of spent amounts.
    pub total_spent: Decimal,
    /// Sum of remaining amounts.
    pub total_remaining: Decimal,
    /// `total_allocated - total_spent`.
    pub variance_amount: Decimal,
    /// `variance_amount / total_allocated * 100`, zero when nothing is allocated.
    pub variance_percentage: Decimal,
    /// Number of allocations spent beyond their amount.
    pub overspent_allocations: u32,
    /// Capture time.
    pub captured_at: DateTime<Utc>,
}

/// Output of one budget reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Allocations with refreshed spent/remaining.
    pub allocations: Vec<Allocation>,
    /// Snapshot to append.
    pub snapshot: MonitoringSnapshot,
}

impl Reconciliation {
    /// Returns the allocations whose figures differ from `before`.
    #[must_use]
    pub fn changed_since<'a>(&'a self, before: &'a [Allocation]) -> Vec<&'a Allocation> {
        self.allocations
            .iter()
            .filter(|after| {
                before.iter().find(|b| b.id == after.id).is_none_or(|b| {
                    b.spent_amount != after.spent_amount
                        || b.remaining_amount != after.remaining_amount
                })
            })
            .collect()
    }
}

/// One allocation in a budget-vs-actual report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReportLine {
    /// Allocation ID.
    pub allocation_id: AllocationId,
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Remaining amount as stored.
    pub remaining: Decimal,
    /// Allocated vs. spent.
    pub variance: VarianceResult,
}

/// Budget vs actual report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVsActualReport {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Period name.
    pub period_name: String,
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
    /// One line per allocation.
    pub lines: Vec<AllocationReportLine>,
    /// Budget-wide variance.
    pub summary: VarianceResult,
}

/// Input for creating a new budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Period ID.
    pub period_id: BudgetPeriodId,
    /// Budget name.
    pub name: String,
    /// Budget type.
    pub budget_type: BudgetType,
    /// Currency code.
    pub currency: String,
    /// Total amount.
    pub total_amount: Decimal,
}

/// Input for creating an allocation.
#[derive(Debug, Clone)]
pub struct CreateAllocationInput {
    /// Parent budget.
    pub budget_id: BudgetId,
    /// Account to track.
    pub account_id: AccountId,
    /// Allocated amount.
    pub allocated_amount: Decimal,
}
