//! Shared fixtures for database integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use budgetline_core::budget::{
    Allocation, Budget, BudgetPeriod, BudgetPeriodStatus, BudgetType, CreateAllocationInput,
    CreateBudgetInput, CreateBudgetPeriodInput,
};
use budgetline_core::events::EventDispatcher;
use budgetline_core::ledger::{
    AccountType, CreateAccountInput, CreateJournalEntryInput, EntrySource, JournalEntry,
    JournalLineInput,
};
use budgetline_db::migration::{Migrator, MigratorTrait};
use budgetline_db::repositories::PostingResult;
use budgetline_db::{
    AccountRepository, BudgetEventHandler, BudgetPeriodRepository, BudgetRepository,
    JournalRepository, OrganizationRepository,
};
use budgetline_shared::types::{AccountId, BudgetId, OrganizationId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub struct Fixture {
    pub db: DatabaseConnection,
    pub org: OrganizationId,
    pub accounts: AccountRepository,
    pub periods: BudgetPeriodRepository,
    pub budgets: BudgetRepository,
    pub journal: JournalRepository,
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Fixture whose journal recalculates affected budgets on post/void.
pub async fn setup() -> Fixture {
    build(true).await
}

/// Fixture whose journal dispatches to nobody.
pub async fn setup_without_events() -> Fixture {
    build(false).await
}

async fn build(with_events: bool) -> Fixture {
    let db = connect().await;
    let org = OrganizationRepository::new(db.clone())
        .create("Acme Corp", "USD")
        .await
        .unwrap();

    let budgets = BudgetRepository::new(db.clone());
    let mut events = EventDispatcher::new();
    if with_events {
        events = events.with_handler(Arc::new(BudgetEventHandler::new(budgets.clone())));
    }

    Fixture {
        org: org.id.into(),
        accounts: AccountRepository::new(db.clone()),
        periods: BudgetPeriodRepository::new(db.clone()),
        budgets,
        journal: JournalRepository::new(db.clone(), events),
        db,
    }
}

impl Fixture {
    pub async fn account(&self, code: &str, account_type: AccountType) -> AccountId {
        self.accounts
            .create_account(CreateAccountInput {
                organization_id: self.org,
                code: code.to_string(),
                name: format!("Account {code}"),
                account_type,
            })
            .await
            .unwrap()
            .id
    }

    /// Q1 2026 period moved along the lifecycle to `status`.
    pub async fn period(&self, status: BudgetPeriodStatus) -> BudgetPeriod {
        let mut period = self
            .periods
            .create_period(CreateBudgetPeriodInput {
                organization_id: self.org,
                name: "FY2026 Q1".to_string(),
                start_date: date(2026, 1, 1),
                end_date: date(2026, 3, 31),
            })
            .await
            .unwrap();

        let path: &[BudgetPeriodStatus] = match status {
            BudgetPeriodStatus::Draft => &[],
            BudgetPeriodStatus::Approved => &[BudgetPeriodStatus::Approved],
            BudgetPeriodStatus::Active => {
                &[BudgetPeriodStatus::Approved, BudgetPeriodStatus::Active]
            }
            BudgetPeriodStatus::Closed => &[
                BudgetPeriodStatus::Approved,
                BudgetPeriodStatus::Active,
                BudgetPeriodStatus::Closed,
            ],
        };
        for next in path {
            period = self
                .periods
                .transition_status(self.org, period.id, *next)
                .await
                .unwrap();
        }
        period
    }

    pub async fn budget(&self, period: &BudgetPeriod, name: &str, total: Decimal) -> Budget {
        self.budgets
            .create_budget(CreateBudgetInput {
                organization_id: self.org,
                period_id: period.id,
                name: name.to_string(),
                budget_type: BudgetType::Operational,
                currency: "USD".to_string(),
                total_amount: total,
            })
            .await
            .unwrap()
    }

    pub async fn allocate(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
        amount: Decimal,
    ) -> Allocation {
        self.budgets
            .create_allocation(
                self.org,
                CreateAllocationInput {
                    budget_id,
                    account_id,
                    allocated_amount: amount,
                },
            )
            .await
            .unwrap()
    }

    pub async fn draft(&self, entry_date: NaiveDate, lines: Vec<JournalLineInput>) -> JournalEntry {
        self.journal
            .create_entry(CreateJournalEntryInput {
                organization_id: self.org,
                entry_date,
                reference: None,
                description: "Test entry".to_string(),
                source: EntrySource::Manual,
                lines,
            })
            .await
            .unwrap()
    }

    pub async fn post(&self, entry_date: NaiveDate, lines: Vec<JournalLineInput>) -> PostingResult {
        let entry = self.draft(entry_date, lines).await;
        self.journal.post_entry(self.org, entry.id).await.unwrap()
    }

    /// Posts `debit` → `credit` for `amount`.
    pub async fn transfer(
        &self,
        entry_date: NaiveDate,
        debit: AccountId,
        credit: AccountId,
        amount: Decimal,
    ) -> PostingResult {
        self.post(
            entry_date,
            vec![
                JournalLineInput::debit(debit, amount),
                JournalLineInput::credit(credit, amount),
            ],
        )
        .await
    }
}
