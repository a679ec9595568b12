//! Demo data seeder for Budgetline development.
//!
//! Seeds one organization with a small chart of accounts, an active quarter,
//! an operations budget, and a few posted journal entries so the budget
//! endpoints have something to show.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use budgetline_core::budget::{
    BudgetPeriod, BudgetPeriodStatus, BudgetType, CreateAllocationInput, CreateBudgetInput,
    CreateBudgetPeriodInput,
};
use budgetline_core::events::EventDispatcher;
use budgetline_core::ledger::{
    AccountType, CreateAccountInput, CreateJournalEntryInput, EntrySource, JournalLineInput,
};
use budgetline_db::entities::organizations;
use budgetline_db::{
    AccountRepository, BudgetEventHandler, BudgetPeriodRepository, BudgetRepository,
    JournalRepository,
};
use budgetline_shared::types::{AccountId, OrganizationId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;
use uuid::Uuid;

/// Demo organization ID (stable across runs).
const DEMO_ORG_ID: Uuid = Uuid::from_u128(1);

/// Chart of accounts: code, name, type.
const ACCOUNTS: [(&str, &str, AccountType); 5] = [
    ("1000", "Operating Cash", AccountType::Asset),
    ("2000", "Accounts Payable", AccountType::Liability),
    ("4000", "Service Revenue", AccountType::Revenue),
    ("6100", "Travel", AccountType::Expense),
    ("6200", "Software Subscriptions", AccountType::Expense),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("seeder=info,budgetline_db=info")
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = budgetline_db::connect(&database_url).await?;
    info!("Connected to database");

    if !seed_organization(&db).await? {
        info!("Demo organization already exists, skipping");
        return Ok(());
    }

    let org = OrganizationId::from(DEMO_ORG_ID);
    let accounts = seed_accounts(&db, org).await?;
    let period = seed_period(&db, org).await?;
    seed_budget(&db, org, &period, &accounts).await?;
    seed_entries(&db, org, &accounts).await?;

    info!("Seeding complete");
    Ok(())
}

fn day(month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, month, day).context("invalid seed date")
}

/// Returns false if the organization was already seeded.
async fn seed_organization(db: &DatabaseConnection) -> anyhow::Result<bool> {
    if organizations::Entity::find_by_id(DEMO_ORG_ID)
        .one(db)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    organizations::ActiveModel {
        id: Set(DEMO_ORG_ID),
        name: Set("Demo Co".to_string()),
        base_currency: Set("USD".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    info!(org_id = %DEMO_ORG_ID, "Seeded organization");
    Ok(true)
}

async fn seed_accounts(
    db: &DatabaseConnection,
    org: OrganizationId,
) -> anyhow::Result<Vec<AccountId>> {
    let repo = AccountRepository::new(db.clone());
    let mut ids = Vec::with_capacity(ACCOUNTS.len());

    for (code, name, account_type) in ACCOUNTS {
        let account = repo
            .create_account(CreateAccountInput {
                organization_id: org,
                code: code.to_string(),
                name: name.to_string(),
                account_type,
            })
            .await?;
        ids.push(account.id);
    }

    info!(count = ids.len(), "Seeded accounts");
    Ok(ids)
}

async fn seed_period(db: &DatabaseConnection, org: OrganizationId) -> anyhow::Result<BudgetPeriod> {
    let repo = BudgetPeriodRepository::new(db.clone());
    let period = repo
        .create_period(CreateBudgetPeriodInput {
            organization_id: org,
            name: "FY2026 Q1".to_string(),
            start_date: day(1, 1)?,
            end_date: day(3, 31)?,
        })
        .await?;

    repo.transition_status(org, period.id, BudgetPeriodStatus::Approved)
        .await?;
    let period = repo
        .transition_status(org, period.id, BudgetPeriodStatus::Active)
        .await?;

    info!(period_id = %period.id, "Seeded active period");
    Ok(period)
}

async fn seed_budget(
    db: &DatabaseConnection,
    org: OrganizationId,
    period: &BudgetPeriod,
    accounts: &[AccountId],
) -> anyhow::Result<()> {
    let repo = BudgetRepository::new(db.clone());
    let budget = repo
        .create_budget(CreateBudgetInput {
            organization_id: org,
            period_id: period.id,
            name: "Operations".to_string(),
            budget_type: BudgetType::Operational,
            currency: "USD".to_string(),
            total_amount: Decimal::new(10_000, 0),
        })
        .await?;

    for (account_id, amount) in [(accounts[3], 4_000), (accounts[4], 3_000)] {
        repo.create_allocation(
            org,
            CreateAllocationInput {
                budget_id: budget.id,
                account_id,
                allocated_amount: Decimal::new(amount, 0),
            },
        )
        .await?;
    }

    info!(budget_id = %budget.id, "Seeded budget with allocations");
    Ok(())
}

/// Posts entries through the journal so the budget recalculates as it would live.
async fn seed_entries(
    db: &DatabaseConnection,
    org: OrganizationId,
    accounts: &[AccountId],
) -> anyhow::Result<()> {
    let events = EventDispatcher::new().with_handler(Arc::new(BudgetEventHandler::new(
        BudgetRepository::new(db.clone()),
    )));
    let journal = JournalRepository::new(db.clone(), events);

    let (cash, payable, travel, software) = (accounts[0], accounts[1], accounts[3], accounts[4]);
    let entries = [
        (day(1, 14)?, "Client visit flights", travel, cash, Decimal::new(125_050, 2)),
        (day(2, 3)?, "Annual IDE licences", software, payable, Decimal::new(2_400, 0)),
        (day(3, 9)?, "Conference travel", travel, cash, Decimal::new(3_100, 0)),
    ];

    for (entry_date, description, debit, credit, amount) in entries {
        let entry = journal
            .create_entry(CreateJournalEntryInput {
                organization_id: org,
                entry_date,
                reference: None,
                description: description.to_string(),
                source: EntrySource::Manual,
                lines: vec![
                    JournalLineInput::debit(debit, amount),
                    JournalLineInput::credit(credit, amount),
                ],
            })
            .await?;
        let posted = journal.post_entry(org, entry.id).await?;
        info!(
            entry_id = %posted.entry.id,
            recalculated = posted.outcome.recalculated.len(),
            "Seeded posted entry"
        );
    }

    Ok(())
}
