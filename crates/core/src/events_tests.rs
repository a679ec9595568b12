use std::sync::Mutex;

use rstest::rstest;

use super::*;
use crate::budget::BudgetPeriodStatus::{Active, Approved, Closed, Draft};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn change(account_ids: Vec<AccountId>, entry_date: NaiveDate) -> EntryChange {
    EntryChange {
        organization_id: OrganizationId::new(),
        entry_id: JournalEntryId::new(),
        entry_date,
        source: EntrySource::Manual,
        account_ids,
    }
}

fn coverage(status: BudgetPeriodStatus, account_ids: Vec<AccountId>) -> BudgetCoverage {
    BudgetCoverage {
        budget_id: BudgetId::new(),
        period_status: status,
        start_date: date(1, 1),
        end_date: date(3, 31),
        account_ids,
    }
}

#[rstest]
#[case(Draft, false)]
#[case(Approved, true)]
#[case(Active, true)]
#[case(Closed, false)]
fn test_only_open_periods_are_affected(#[case] status: BudgetPeriodStatus, #[case] expected: bool) {
    let account = AccountId::new();
    let budget = coverage(status, vec![account]);

    assert_eq!(budget.is_affected_by(&change(vec![account], date(2, 15))), expected);
}

#[rstest]
#[case(date(1, 1), true)]
#[case(date(3, 31), true)]
#[case(date(4, 1), false)]
#[case(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(), false)]
fn test_period_range_is_inclusive(#[case] entry_date: NaiveDate, #[case] expected: bool) {
    let account = AccountId::new();
    let budget = coverage(Active, vec![account]);

    assert_eq!(budget.is_affected_by(&change(vec![account], entry_date)), expected);
}

#[test]
fn test_affected_budgets_requires_shared_account() {
    let rent = AccountId::new();
    let travel = AccountId::new();
    let cash = AccountId::new();

    let rent_budget = coverage(Active, vec![rent]);
    let travel_budget = coverage(Active, vec![travel]);
    let event = LedgerEvent::EntryPosted(change(vec![rent, cash], date(2, 1)));

    let ids = affected_budgets(&event, &[rent_budget.clone(), travel_budget]);

    assert_eq!(ids, vec![rent_budget.budget_id]);
}

#[test]
fn test_event_accessors() {
    let payload = change(vec![AccountId::new()], date(1, 5));
    let posted = LedgerEvent::EntryPosted(payload.clone());
    let voided = LedgerEvent::EntryVoided(payload.clone());

    assert_eq!(posted.name(), "entry_posted");
    assert_eq!(voided.name(), "entry_voided");
    assert_eq!(voided.change(), &payload);
}

#[test]
fn test_outcome_merge_dedups() {
    let a = BudgetId::new();
    let b = BudgetId::new();
    let mut outcome = EventOutcome {
        recalculated: vec![a],
    };

    outcome.merge(EventOutcome {
        recalculated: vec![a, b],
    });

    assert_eq!(outcome.recalculated, vec![a, b]);
}

struct Recording {
    seen: Mutex<Vec<&'static str>>,
    budget_id: BudgetId,
}

#[async_trait::async_trait]
impl LedgerEventHandler for Recording {
    async fn handle(&self, event: &LedgerEvent) -> Result<EventOutcome, EventError> {
        self.seen.lock().unwrap().push(event.name());
        Ok(EventOutcome {
            recalculated: vec![self.budget_id],
        })
    }
}

struct Failing;

#[async_trait::async_trait]
impl LedgerEventHandler for Failing {
    async fn handle(&self, _event: &LedgerEvent) -> Result<EventOutcome, EventError> {
        Err(EventError::Handler("connection reset".to_string()))
    }
}

#[tokio::test]
async fn test_dispatch_runs_every_handler() {
    let first = Arc::new(Recording {
        seen: Mutex::new(Vec::new()),
        budget_id: BudgetId::new(),
    });
    let second = Arc::new(Recording {
        seen: Mutex::new(Vec::new()),
        budget_id: BudgetId::new(),
    });
    let dispatcher = EventDispatcher::new()
        .with_handler(first.clone())
        .with_handler(second.clone());

    let event = LedgerEvent::EntryVoided(change(vec![AccountId::new()], date(2, 2)));
    let outcome = dispatcher.dispatch(&event).await.unwrap();

    assert_eq!(dispatcher.len(), 2);
    assert_eq!(outcome.recalculated, vec![first.budget_id, second.budget_id]);
    assert_eq!(*first.seen.lock().unwrap(), vec!["entry_voided"]);
    assert_eq!(*second.seen.lock().unwrap(), vec!["entry_voided"]);
}

#[tokio::test]
async fn test_dispatch_propagates_handler_error() {
    let dispatcher = EventDispatcher::new().with_handler(Arc::new(Failing));
    let event = LedgerEvent::EntryPosted(change(vec![], date(1, 1)));

    let err = dispatcher.dispatch(&event).await.unwrap_err();

    assert!(matches!(err, EventError::Handler(_)));
}

#[tokio::test]
async fn test_empty_dispatcher_is_noop() {
    let dispatcher = EventDispatcher::new();
    assert!(dispatcher.is_empty());

    let event = LedgerEvent::EntryPosted(change(vec![], date(1, 1)));
    assert_eq!(dispatcher.dispatch(&event).await.unwrap(), EventOutcome::default());
}
