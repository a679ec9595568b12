//! Budget error types.

use budgetline_shared::types::{AccountId, AllocationId, BudgetId, BudgetPeriodId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::period::BudgetPeriodStatus;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget period not found.
    #[error("Budget period not found: {0}")]
    PeriodNotFound(BudgetPeriodId),

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(AllocationId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Budget period is closed and its budgets cannot be modified.
    #[error("Budget period is closed and cannot be modified")]
    PeriodClosed,

    /// Period status transition outside the lifecycle.
    #[error("Cannot move budget period from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: BudgetPeriodStatus,
        /// Requested status.
        to: BudgetPeriodStatus,
    },

    /// Period ends before it starts.
    #[error("Budget period end date must not be before its start date")]
    InvalidDateRange,

    /// Budget name already exists in this period.
    #[error("Budget name already exists for this period")]
    DuplicateName,

    /// Account already has an allocation in this budget.
    #[error("Account {0} already has an allocation in this budget")]
    DuplicateAllocation(AccountId),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount has more decimal places than money columns keep.
    #[error("Amount {0} has more than 4 decimal places")]
    ExcessPrecision(Decimal),

    /// Allocations would exceed the budget total.
    #[error("Allocations would exceed the budget total: allocated {allocated}, total {total}")]
    OverAllocated {
        /// Sum of allocations including the new one.
        allocated: Decimal,
        /// Budget total.
        total: Decimal,
    },

    /// Currency code is not a 3-letter ISO 4217 code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Unknown budget type string.
    #[error("Invalid budget type: {0}")]
    InvalidBudgetType(String),

    /// Unknown period status string.
    #[error("Invalid budget period status: {0}")]
    InvalidPeriodStatus(String),
}

impl From<BudgetError> for budgetline_shared::AppError {
    fn from(err: BudgetError) -> Self {
        let message = err.to_string();
        match err {
            BudgetError::NotFound(_)
            | BudgetError::PeriodNotFound(_)
            | BudgetError::AllocationNotFound(_)
            | BudgetError::AccountNotFound(_) => Self::NotFound(message),
            BudgetError::DuplicateName | BudgetError::DuplicateAllocation(_) => {
                Self::Conflict(message)
            }
            BudgetError::PeriodClosed
            | BudgetError::InvalidStatusTransition { .. }
            | BudgetError::OverAllocated { .. } => Self::BusinessRule(message),
            BudgetError::InvalidDateRange
            | BudgetError::NegativeAmount
            | BudgetError::ExcessPrecision(_)
            | BudgetError::InvalidCurrency(_)
            | BudgetError::InvalidBudgetType(_)
            | BudgetError::InvalidPeriodStatus(_) => Self::Validation(message),
        }
    }
}
