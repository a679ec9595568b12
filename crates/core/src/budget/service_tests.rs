use std::collections::HashMap;

use budgetline_shared::types::{AccountId, AllocationId, BudgetId, BudgetPeriodId, OrganizationId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::budget::period::BudgetPeriodStatus;
use crate::budget::types::BudgetType;
use crate::budget::variance::VarianceStatus;

fn period(status: BudgetPeriodStatus) -> BudgetPeriod {
    BudgetPeriod {
        id: BudgetPeriodId::new(),
        organization_id: OrganizationId::new(),
        name: "FY2026 Q1".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        status,
    }
}

fn budget(total: Decimal) -> Budget {
    Budget {
        id: BudgetId::new(),
        organization_id: OrganizationId::new(),
        period_id: BudgetPeriodId::new(),
        name: "Operations".to_string(),
        budget_type: BudgetType::Operational,
        currency: "USD".to_string(),
        total_amount: total,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn allocation(budget_id: BudgetId, allocated: Decimal) -> Allocation {
    Allocation {
        id: AllocationId::new(),
        budget_id,
        account_id: AccountId::new(),
        allocated_amount: allocated,
        spent_amount: Decimal::ZERO,
        remaining_amount: allocated,
        last_calculated_at: None,
    }
}

fn activity(normal_balance: NormalBalance, debit: Decimal, credit: Decimal) -> AccountActivity {
    AccountActivity {
        normal_balance,
        totals: AccountTotals::new(debit, credit),
    }
}

#[test]
fn test_net_spend_debit_normal() {
    let totals = AccountTotals::new(dec!(500), dec!(120));
    assert_eq!(BudgetService::net_spend(NormalBalance::Debit, totals), dec!(380));
}

#[test]
fn test_net_spend_credit_normal() {
    let totals = AccountTotals::new(dec!(120), dec!(500));
    assert_eq!(BudgetService::net_spend(NormalBalance::Credit, totals), dec!(380));
}

#[test]
fn test_net_spend_floors_at_zero() {
    let totals = AccountTotals::new(dec!(100), dec!(300));
    assert_eq!(BudgetService::net_spend(NormalBalance::Debit, totals), Decimal::ZERO);
}

#[test]
fn test_recalculate_allocation_recomputes_remaining() {
    let original = allocation(BudgetId::new(), dec!(1000));
    let at = Utc::now();

    let updated = BudgetService::recalculate_allocation(&original, dec!(1250), at);

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.spent_amount, dec!(1250));
    assert_eq!(updated.remaining_amount, dec!(-250));
    assert_eq!(updated.last_calculated_at, Some(at));
}

#[test]
fn test_summarize_counts_overspent() {
    let budget_id = BudgetId::new();
    let at = Utc::now();
    let allocations = vec![
        BudgetService::recalculate_allocation(&allocation(budget_id, dec!(1000)), dec!(400), at),
        BudgetService::recalculate_allocation(&allocation(budget_id, dec!(500)), dec!(600), at),
    ];

    let totals = BudgetService::summarize(&allocations);

    assert_eq!(totals.allocated, dec!(1500));
    assert_eq!(totals.spent, dec!(1000));
    assert_eq!(totals.remaining, dec!(500));
    assert_eq!(totals.overspent_allocations, 1);
}

#[test]
fn test_reconcile_builds_snapshot() {
    let budget = budget(dec!(2000));
    let rent = allocation(budget.id, dec!(1000));
    let travel = allocation(budget.id, dec!(500));

    let mut ledger = HashMap::new();
    ledger.insert(rent.account_id, activity(NormalBalance::Debit, dec!(750), dec!(0)));
    ledger.insert(travel.account_id, activity(NormalBalance::Debit, dec!(0), dec!(0)));

    let result =
        BudgetService::reconcile(&budget, &[rent.clone(), travel], &ledger, Utc::now()).unwrap();

    assert_eq!(result.allocations[0].spent_amount, dec!(750));
    assert_eq!(result.allocations[0].remaining_amount, dec!(250));
    assert_eq!(result.allocations[1].spent_amount, dec!(0));

    let snapshot = result.snapshot;
    assert_eq!(snapshot.budget_id, budget.id);
    assert_eq!(snapshot.total_allocated, dec!(1500));
    assert_eq!(snapshot.total_spent, dec!(750));
    assert_eq!(snapshot.total_remaining, dec!(750));
    assert_eq!(snapshot.variance_amount, dec!(750));
    assert_eq!(snapshot.variance_percentage, dec!(50.00));
    assert_eq!(snapshot.overspent_allocations, 0);
}

#[test]
fn test_reconcile_missing_account() {
    let budget = budget(dec!(1000));
    let orphan = allocation(budget.id, dec!(100));

    let err = BudgetService::reconcile(&budget, &[orphan.clone()], &HashMap::new(), Utc::now())
        .unwrap_err();

    assert!(matches!(err, BudgetError::AccountNotFound(id) if id == orphan.account_id));
}

#[test]
fn test_reconcile_without_allocations_yields_zero_snapshot() {
    let budget = budget(dec!(1000));

    let result = BudgetService::reconcile(&budget, &[], &HashMap::new(), Utc::now()).unwrap();

    assert!(result.allocations.is_empty());
    assert_eq!(result.snapshot.total_allocated, Decimal::ZERO);
    assert_eq!(result.snapshot.variance_percentage, Decimal::ZERO);
}

#[test]
fn test_validate_budget_input() {
    let period = period(BudgetPeriodStatus::Draft);
    let mut input = CreateBudgetInput {
        organization_id: period.organization_id,
        period_id: period.id,
        name: "Marketing".to_string(),
        budget_type: BudgetType::Operational,
        currency: "EUR".to_string(),
        total_amount: dec!(5000),
    };
    assert!(BudgetService::validate_budget_input(&input, &period).is_ok());

    input.currency = "eur".to_string();
    assert!(matches!(
        BudgetService::validate_budget_input(&input, &period),
        Err(BudgetError::InvalidCurrency(_))
    ));

    input.currency = "EUR".to_string();
    input.total_amount = dec!(-1);
    assert!(matches!(
        BudgetService::validate_budget_input(&input, &period),
        Err(BudgetError::NegativeAmount)
    ));

    input.total_amount = dec!(5000.12345);
    assert!(matches!(
        BudgetService::validate_budget_input(&input, &period),
        Err(BudgetError::ExcessPrecision(amount)) if amount == dec!(5000.12345)
    ));
}

#[test]
fn test_validate_allocation_ok() {
    let budget = budget(dec!(1000));
    let existing = vec![allocation(budget.id, dec!(600))];
    let input = CreateAllocationInput {
        budget_id: budget.id,
        account_id: AccountId::new(),
        allocated_amount: dec!(400),
    };

    let period = period(BudgetPeriodStatus::Active);
    assert!(BudgetService::validate_allocation(&budget, &period, &existing, &input).is_ok());
}

#[test]
fn test_validate_allocation_rejects_over_allocation() {
    let budget = budget(dec!(1000));
    let existing = vec![allocation(budget.id, dec!(600))];
    let input = CreateAllocationInput {
        budget_id: budget.id,
        account_id: AccountId::new(),
        allocated_amount: dec!(400.01),
    };

    let err = BudgetService::validate_allocation(
        &budget,
        &period(BudgetPeriodStatus::Draft),
        &existing,
        &input,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BudgetError::OverAllocated { allocated, total }
            if allocated == dec!(1000.01) && total == dec!(1000)
    ));
}

#[test]
fn test_validate_allocation_rejects_closed_period() {
    let budget = budget(dec!(1000));
    let input = CreateAllocationInput {
        budget_id: budget.id,
        account_id: AccountId::new(),
        allocated_amount: dec!(100),
    };

    let err = BudgetService::validate_allocation(
        &budget,
        &period(BudgetPeriodStatus::Closed),
        &[],
        &input,
    )
    .unwrap_err();
    assert!(matches!(err, BudgetError::PeriodClosed));
}

#[test]
fn test_validate_allocation_rejects_duplicate_and_negative() {
    let budget = budget(dec!(1000));
    let existing = allocation(budget.id, dec!(100));
    let period = period(BudgetPeriodStatus::Draft);

    let duplicate = CreateAllocationInput {
        budget_id: budget.id,
        account_id: existing.account_id,
        allocated_amount: dec!(100),
    };
    assert!(matches!(
        BudgetService::validate_allocation(&budget, &period, &[existing.clone()], &duplicate),
        Err(BudgetError::DuplicateAllocation(_))
    ));

    let negative = CreateAllocationInput {
        allocated_amount: dec!(-5),
        account_id: AccountId::new(),
        ..duplicate
    };
    assert!(matches!(
        BudgetService::validate_allocation(&budget, &period, &[existing.clone()], &negative),
        Err(BudgetError::NegativeAmount)
    ));

    let too_precise = CreateAllocationInput {
        allocated_amount: dec!(10.00001),
        ..negative
    };
    assert!(matches!(
        BudgetService::validate_allocation(&budget, &period, &[existing], &too_precise),
        Err(BudgetError::ExcessPrecision(_))
    ));
}

#[test]
fn test_report_summary() {
    let budget = budget(dec!(3000));
    let at = Utc::now();
    let office = BudgetService::recalculate_allocation(&allocation(budget.id, dec!(2000)), dec!(500), at);
    let travel = BudgetService::recalculate_allocation(&allocation(budget.id, dec!(1000)), dec!(1500), at);

    let lines = vec![
        BudgetService::report_line(&office, "6100", "Office Supplies"),
        BudgetService::report_line(&travel, "6200", "Travel"),
    ];
    let report = BudgetService::report(&budget, &period(BudgetPeriodStatus::Active), lines);

    assert_eq!(report.lines[0].variance.status, VarianceStatus::Favorable);
    assert_eq!(report.lines[1].variance.status, VarianceStatus::Unfavorable);
    assert_eq!(report.lines[1].remaining, dec!(-500));
    assert_eq!(report.summary.allocated, dec!(3000));
    assert_eq!(report.summary.spent, dec!(2000));
    assert_eq!(report.summary.variance_percent, dec!(33.33));
}
