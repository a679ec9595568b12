//! Budget reconciliation and validation.
//!
//! Everything here is pure arithmetic over already-loaded rows; the
//! persistence layer gathers ledger activity and writes the results back.

use std::collections::HashMap;

use budgetline_shared::types::{AccountId, SnapshotId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::period::BudgetPeriod;
use super::types::{
    AccountActivity, Allocation, AllocationReportLine, Budget, BudgetTotals,
    BudgetVsActualReport, CreateAllocationInput, CreateBudgetInput, MonitoringSnapshot,
    Reconciliation,
};
use super::variance::{VarianceResult, percent_of};
use crate::ledger::{AccountTotals, NormalBalance};
use crate::money::exceeds_money_scale;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Net spend on an account's normal side, floored at zero.
    ///
    /// Debit-normal: `max(0, debit - credit)`.
    /// Credit-normal: `max(0, credit - debit)`.
    #[must_use]
    pub fn net_spend(normal_balance: NormalBalance, totals: AccountTotals) -> Decimal {
        totals.balance(normal_balance).max(Decimal::ZERO)
    }

    /// Returns the allocation with `spent` applied and `remaining` recomputed.
    #[must_use]
    pub fn recalculate_allocation(
        allocation: &Allocation,
        spent: Decimal,
        calculated_at: DateTime<Utc>,
    ) -> Allocation {
        Allocation {
            spent_amount: spent,
            remaining_amount: allocation.allocated_amount - spent,
            last_calculated_at: Some(calculated_at),
            ..allocation.clone()
        }
    }

    /// Sums allocated, spent and remaining amounts.
    #[must_use]
    pub fn summarize(allocations: &[Allocation]) -> BudgetTotals {
        allocations
            .iter()
            .fold(BudgetTotals::default(), |mut totals, allocation| {
                totals.allocated += allocation.allocated_amount;
                totals.spent += allocation.spent_amount;
                totals.remaining += allocation.remaining_amount;
                if allocation.is_overspent() {
                    totals.overspent_allocations += 1;
                }
                totals
            })
    }

    /// Compares allocated and spent amounts.
    #[must_use]
    pub fn calculate_variance(allocated: Decimal, spent: Decimal) -> VarianceResult {
        VarianceResult::calculate(allocated, spent)
    }

    /// Builds a monitoring snapshot from the budget's current allocations.
    #[must_use]
    pub fn snapshot(
        budget: &Budget,
        allocations: &[Allocation],
        captured_at: DateTime<Utc>,
    ) -> MonitoringSnapshot {
        let totals = Self::summarize(allocations);
        let variance_amount = totals.allocated - totals.spent;

        MonitoringSnapshot {
            id: SnapshotId::new(),
            budget_id: budget.id,
            organization_id: budget.organization_id,
            total_allocated: totals.allocated,
            total_spent: totals.spent,
            total_remaining: totals.remaining,
            variance_amount,
            variance_percentage: percent_of(variance_amount, totals.allocated),
            overspent_allocations: totals.overspent_allocations,
            captured_at,
        }
    }

    /// Recomputes every allocation from ledger activity and snapshots the result.
    ///
    /// `activity` must hold an entry for each allocated account; accounts with
    /// no posted lines in the period map to zero totals.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AccountNotFound` if an allocation's account has
    /// no entry in `activity`.
    pub fn reconcile(
        budget: &Budget,
        allocations: &[Allocation],
        activity: &HashMap<AccountId, AccountActivity>,
        at: DateTime<Utc>,
    ) -> Result<Reconciliation, BudgetError> {
        let allocations = allocations
            .iter()
            .map(|allocation| {
                let account = activity
                    .get(&allocation.account_id)
                    .ok_or(BudgetError::AccountNotFound(allocation.account_id))?;
                let spent = Self::net_spend(account.normal_balance, account.totals);
                Ok(Self::recalculate_allocation(allocation, spent, at))
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        let snapshot = Self::snapshot(budget, &allocations, at);

        Ok(Reconciliation {
            allocations,
            snapshot,
        })
    }

    /// Validates a new budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` for a negative total,
    /// `BudgetError::ExcessPrecision` beyond four decimal places and
    /// `BudgetError::InvalidCurrency` unless the currency is three uppercase
    /// ASCII letters.
    pub fn validate_budget_input(
        input: &CreateBudgetInput,
        period: &BudgetPeriod,
    ) -> Result<(), BudgetError> {
        if period.status.is_closed() {
            return Err(BudgetError::PeriodClosed);
        }

        if input.total_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        if exceeds_money_scale(input.total_amount) {
            return Err(BudgetError::ExcessPrecision(input.total_amount));
        }

        let currency = input.currency.as_bytes();
        if currency.len() != 3 || !currency.iter().all(u8::is_ascii_uppercase) {
            return Err(BudgetError::InvalidCurrency(input.currency.clone()));
        }

        Ok(())
    }

    /// Validates a new allocation against its budget and siblings.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` if the amount is negative.
    /// - `ExcessPrecision` if the amount has more than four decimal places.
    /// - `PeriodClosed` if the budget's period is closed.
    /// - `DuplicateAllocation` if the account is already allocated.
    /// - `OverAllocated` if the allocations would exceed the budget total.
    pub fn validate_allocation(
        budget: &Budget,
        period: &BudgetPeriod,
        existing: &[Allocation],
        input: &CreateAllocationInput,
    ) -> Result<(), BudgetError> {
        if input.allocated_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        if exceeds_money_scale(input.allocated_amount) {
            return Err(BudgetError::ExcessPrecision(input.allocated_amount));
        }

        if period.status.is_closed() {
            return Err(BudgetError::PeriodClosed);
        }

        if existing.iter().any(|a| a.account_id == input.account_id) {
            return Err(BudgetError::DuplicateAllocation(input.account_id));
        }

        let allocated = existing
            .iter()
            .map(|a| a.allocated_amount)
            .sum::<Decimal>()
            + input.allocated_amount;
        if allocated > budget.total_amount {
            return Err(BudgetError::OverAllocated {
                allocated,
                total: budget.total_amount,
            });
        }

        Ok(())
    }

    /// Builds one report line from stored allocation figures.
    #[must_use]
    pub fn report_line(
        allocation: &Allocation,
        account_code: &str,
        account_name: &str,
    ) -> AllocationReportLine {
        AllocationReportLine {
            allocation_id: allocation.id,
            account_id: allocation.account_id,
            account_code: account_code.to_string(),
            account_name: account_name.to_string(),
            remaining: allocation.remaining_amount,
            variance: Self::calculate_variance(
                allocation.allocated_amount,
                allocation.spent_amount,
            ),
        }
    }

    /// Assembles the budget-vs-actual report.
    #[must_use]
    pub fn report(
        budget: &Budget,
        period: &BudgetPeriod,
        lines: Vec<AllocationReportLine>,
    ) -> BudgetVsActualReport {
        let (allocated, spent) = lines.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(allocated, spent), line| {
                (allocated + line.variance.allocated, spent + line.variance.spent)
            },
        );

        BudgetVsActualReport {
            budget_id: budget.id,
            budget_name: budget.name.clone(),
            period_name: period.name.clone(),
            start_date: period.start_date,
            end_date: period.end_date,
            lines,
            summary: Self::calculate_variance(allocated, spent),
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
