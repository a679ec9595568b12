//! Integration tests for journal posting and event-driven recalculation.

mod common;

use budgetline_core::budget::BudgetPeriodStatus;
use budgetline_core::ledger::{
    AccountType, CreateJournalEntryInput, EntrySource, JournalEntryStatus, JournalLineInput,
    LedgerError,
};
use budgetline_db::repositories::JournalError;
use budgetline_shared::types::AccountId;
use common::{date, setup, setup_without_events};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_create_rejects_unbalanced_entry() {
    let fx = setup_without_events().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;

    let err = fx
        .journal
        .create_entry(CreateJournalEntryInput {
            organization_id: fx.org,
            entry_date: date(2026, 1, 5),
            reference: Some("INV-1".to_string()),
            description: "Unbalanced".to_string(),
            source: EntrySource::PurchaseInvoice,
            lines: vec![
                JournalLineInput::debit(supplies, dec!(100)),
                JournalLineInput::credit(cash, dec!(90)),
            ],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, JournalError::Ledger(LedgerError::Unbalanced { .. })));
}

#[tokio::test]
async fn test_create_rejects_unknown_account() {
    let fx = setup_without_events().await;
    let cash = fx.account("1000", AccountType::Asset).await;
    let stranger = AccountId::new();

    let err = fx
        .journal
        .create_entry(CreateJournalEntryInput {
            organization_id: fx.org,
            entry_date: date(2026, 1, 5),
            reference: None,
            description: "Unknown account".to_string(),
            source: EntrySource::Manual,
            lines: vec![
                JournalLineInput::debit(stranger, dec!(10)),
                JournalLineInput::credit(cash, dec!(10)),
            ],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JournalError::Ledger(LedgerError::AccountNotFound(id)) if id == stranger
    ));
}

#[tokio::test]
async fn test_post_then_void_lifecycle() {
    let fx = setup_without_events().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;

    let draft = fx
        .draft(
            date(2026, 1, 10),
            vec![
                JournalLineInput::debit(supplies, dec!(40)).with_memo("Paper"),
                JournalLineInput::credit(cash, dec!(40)),
            ],
        )
        .await;
    assert_eq!(draft.status, JournalEntryStatus::Draft);
    assert!(draft.posted_at.is_none());

    // Voiding a draft is not allowed.
    let err = fx.journal.void_entry(fx.org, draft.id).await.unwrap_err();
    assert!(matches!(
        err,
        JournalError::Ledger(LedgerError::InvalidStatusChange { .. })
    ));

    let posted = fx.journal.post_entry(fx.org, draft.id).await.unwrap();
    assert_eq!(posted.entry.status, JournalEntryStatus::Posted);
    assert!(posted.entry.posted_at.is_some());
    assert_eq!(posted.entry.lines.len(), 2);
    assert_eq!(posted.entry.lines[0].memo.as_deref(), Some("Paper"));
    assert!(posted.outcome.recalculated.is_empty());

    // Posting twice is not allowed.
    let err = fx.journal.post_entry(fx.org, draft.id).await.unwrap_err();
    assert!(matches!(
        err,
        JournalError::Ledger(LedgerError::InvalidStatusChange { .. })
    ));

    let voided = fx.journal.void_entry(fx.org, draft.id).await.unwrap();
    assert_eq!(voided.entry.status, JournalEntryStatus::Voided);

    let reloaded = fx.journal.get_entry(fx.org, draft.id).await.unwrap();
    assert_eq!(reloaded.status, JournalEntryStatus::Voided);
}

#[tokio::test]
async fn test_post_rejects_inactive_account() {
    let fx = setup_without_events().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;

    let draft = fx
        .draft(
            date(2026, 1, 10),
            vec![
                JournalLineInput::debit(supplies, dec!(40)),
                JournalLineInput::credit(cash, dec!(40)),
            ],
        )
        .await;
    fx.accounts.set_active(fx.org, supplies, false).await.unwrap();

    let err = fx.journal.post_entry(fx.org, draft.id).await.unwrap_err();

    assert!(matches!(
        err,
        JournalError::Ledger(LedgerError::AccountInactive(id)) if id == supplies
    ));
    let reloaded = fx.journal.get_entry(fx.org, draft.id).await.unwrap();
    assert_eq!(reloaded.status, JournalEntryStatus::Draft);
}

#[tokio::test]
async fn test_posting_recalculates_affected_budgets_only() {
    let fx = setup().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let travel = fx.account("6200", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;

    let active = fx.period(BudgetPeriodStatus::Active).await;
    let draft_period = fx.period(BudgetPeriodStatus::Draft).await;

    let operations = fx.budget(&active, "Operations", dec!(2000)).await;
    fx.allocate(operations.id, supplies, dec!(1000)).await;
    let travel_budget = fx.budget(&active, "Travel", dec!(2000)).await;
    fx.allocate(travel_budget.id, travel, dec!(1000)).await;
    let planning = fx.budget(&draft_period, "Planning", dec!(2000)).await;
    fx.allocate(planning.id, supplies, dec!(1000)).await;

    let posted = fx.transfer(date(2026, 2, 14), supplies, cash, dec!(250)).await;

    assert_eq!(posted.outcome.recalculated, vec![operations.id]);

    let allocations = fx.budgets.get_allocations(operations.id).await.unwrap();
    assert_eq!(allocations[0].spent_amount, dec!(250));
    assert_eq!(allocations[0].remaining_amount, dec!(750));

    assert!(fx.budgets.latest_snapshot(fx.org, operations.id).await.unwrap().is_some());
    assert!(fx.budgets.latest_snapshot(fx.org, travel_budget.id).await.unwrap().is_none());
    assert!(fx.budgets.latest_snapshot(fx.org, planning.id).await.unwrap().is_none());

    let untouched = fx.budgets.get_allocations(planning.id).await.unwrap();
    assert_eq!(untouched[0].spent_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_posting_outside_period_triggers_nothing() {
    let fx = setup().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;
    let period = fx.period(BudgetPeriodStatus::Approved).await;
    let budget = fx.budget(&period, "Operations", dec!(2000)).await;
    fx.allocate(budget.id, supplies, dec!(1000)).await;

    let posted = fx.transfer(date(2026, 6, 1), supplies, cash, dec!(250)).await;

    assert!(posted.outcome.recalculated.is_empty());
}

#[tokio::test]
async fn test_voiding_recalculates_back_to_zero() {
    let fx = setup().await;
    let supplies = fx.account("6100", AccountType::Expense).await;
    let cash = fx.account("1000", AccountType::Asset).await;
    let period = fx.period(BudgetPeriodStatus::Approved).await;
    let budget = fx.budget(&period, "Operations", dec!(2000)).await;
    fx.allocate(budget.id, supplies, dec!(1000)).await;

    let posted = fx.transfer(date(2026, 3, 1), supplies, cash, dec!(600)).await;
    assert_eq!(posted.outcome.recalculated, vec![budget.id]);

    let voided = fx.journal.void_entry(fx.org, posted.entry.id).await.unwrap();
    assert_eq!(voided.outcome.recalculated, vec![budget.id]);

    let allocations = fx.budgets.get_allocations(budget.id).await.unwrap();
    assert_eq!(allocations[0].spent_amount, Decimal::ZERO);
    assert_eq!(allocations[0].remaining_amount, dec!(1000));
}
