//! Budget repository: budgets, allocations, spend recalculation, snapshots.

use std::collections::HashMap;

use budgetline_core::budget::{
    AccountActivity, Allocation, Budget, BudgetError, BudgetPeriod, BudgetService,
    BudgetVsActualReport, CreateAllocationInput, CreateBudgetInput, MonitoringSnapshot,
    Reconciliation,
};
use budgetline_core::events::BudgetCoverage;
use budgetline_core::ledger::{AccountTotals, AccountType};
use budgetline_shared::AppError;
use budgetline_shared::types::{
    AccountId, AllocationId, BudgetId, OrganizationId, PageRequest, PageResponse,
};
use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::budget_period::find_period;
use super::convert::{self, now};
use crate::entities::{
    accounts, allocations, budget_periods, budgets, journal_entries, journal_lines,
    monitoring_snapshots,
    sea_orm_active_enums::{EntryStatus, PeriodStatus},
};

/// Error types for budget persistence.
#[derive(Debug, thiserror::Error)]
pub enum BudgetRepoError {
    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BudgetRepoError> for AppError {
    fn from(err: BudgetRepoError) -> Self {
        match err {
            BudgetRepoError::Budget(e) => e.into(),
            BudgetRepoError::OrganizationNotFound(_) => Self::NotFound(err.to_string()),
            BudgetRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A budget with its allocations.
#[derive(Debug, Clone)]
pub struct BudgetWithAllocations {
    /// Budget record.
    pub budget: Budget,
    /// Allocations in creation order.
    pub allocations: Vec<Allocation>,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Budgets and allocations
    // ========================================================================

    /// Creates a budget in a period.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The period does not exist or is closed
    /// - The name is already used in the period
    /// - The total is negative or the currency malformed
    pub async fn create_budget(&self, input: CreateBudgetInput) -> Result<Budget, BudgetRepoError> {
        let period: BudgetPeriod =
            find_period(&self.db, input.organization_id, input.period_id).await?.into();
        BudgetService::validate_budget_input(&input, &period)?;

        let duplicate = budgets::Entity::find()
            .filter(budgets::Column::PeriodId.eq(input.period_id.into_inner()))
            .filter(budgets::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(BudgetError::DuplicateName.into());
        }

        let timestamp = now();
        let model = budgets::ActiveModel {
            id: Set(BudgetId::new().into()),
            organization_id: Set(input.organization_id.into()),
            period_id: Set(input.period_id.into()),
            name: Set(input.name),
            budget_type: Set(input.budget_type.into()),
            currency: Set(input.currency),
            total_amount: Set(input.total_amount),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&self.db)
        .await?;

        info!(budget_id = %model.id, period_id = %model.period_id, "Budget created");
        Ok(model.into())
    }

    /// Gets a budget in an organization.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist.
    pub async fn get_budget(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
    ) -> Result<Budget, BudgetRepoError> {
        Ok(find_budget(&self.db, organization_id, budget_id).await?.into())
    }

    /// Gets a budget together with its allocations.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if it does not exist.
    pub async fn get_budget_with_allocations(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
    ) -> Result<BudgetWithAllocations, BudgetRepoError> {
        let budget = self.get_budget(organization_id, budget_id).await?;
        let allocations = self.get_allocations(budget_id).await?;
        Ok(BudgetWithAllocations {
            budget,
            allocations,
        })
    }

    /// Lists a budget's allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_allocations(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<Allocation>, BudgetRepoError> {
        Ok(load_allocations(&self.db, budget_id)
            .await?
            .into_iter()
            .map(Allocation::from)
            .collect())
    }

    /// Adds an allocation for one account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The budget or account does not exist in the organization
    /// - The account is already allocated in this budget
    /// - The period is closed
    /// - The allocations would exceed the budget total
    pub async fn create_allocation(
        &self,
        organization_id: OrganizationId,
        input: CreateAllocationInput,
    ) -> Result<Allocation, BudgetRepoError> {
        let txn = self.db.begin().await?;

        let budget: Budget = find_budget(&txn, organization_id, input.budget_id)
            .await?
            .into();
        let period: BudgetPeriod = find_period(&txn, organization_id, budget.period_id)
            .await?
            .into();

        let account = accounts::Entity::find_by_id(input.account_id.into_inner())
            .filter(accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&txn)
            .await?;
        if account.is_none() {
            return Err(BudgetError::AccountNotFound(input.account_id).into());
        }

        let existing: Vec<Allocation> = load_allocations(&txn, budget.id)
            .await?
            .into_iter()
            .map(Allocation::from)
            .collect();
        BudgetService::validate_allocation(&budget, &period, &existing, &input)?;

        let timestamp = now();
        let model = allocations::ActiveModel {
            id: Set(AllocationId::new().into()),
            budget_id: Set(budget.id.into()),
            account_id: Set(input.account_id.into()),
            allocated_amount: Set(input.allocated_amount),
            spent_amount: Set(rust_decimal::Decimal::ZERO),
            remaining_amount: Set(input.allocated_amount),
            last_calculated_at: Set(None),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        debug!(
            allocation_id = %model.id,
            budget_id = %budget.id,
            account_id = %input.account_id,
            "Allocation created"
        );
        Ok(model.into())
    }

    // ========================================================================
    // Spend recalculation
    // ========================================================================

    /// Recomputes spent/remaining for every allocation from posted ledger
    /// lines in the budget's period, then appends a monitoring snapshot.
    ///
    /// Runs in one transaction; nothing is written on error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The budget does not exist in the organization (`NotFound`)
    /// - An allocation references a missing account (`AccountNotFound`)
    pub async fn recalculate_spending(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
    ) -> Result<Reconciliation, BudgetRepoError> {
        let txn = self.db.begin().await?;

        let budget: Budget = find_budget(&txn, organization_id, budget_id).await?.into();
        let period: BudgetPeriod = find_period(&txn, organization_id, budget.period_id)
            .await?
            .into();
        let current: Vec<Allocation> = load_allocations(&txn, budget_id)
            .await?
            .into_iter()
            .map(Allocation::from)
            .collect();

        let activity = load_activity(&txn, organization_id, &period, &current).await?;
        let calculated_at = Utc::now();
        let reconciliation = BudgetService::reconcile(&budget, &current, &activity, calculated_at)?;

        // Every allocation is stamped; only moved figures are rewritten.
        allocations::Entity::update_many()
            .col_expr(
                allocations::Column::LastCalculatedAt,
                sea_orm::sea_query::Expr::value(DateTimeWithTimeZone::from(calculated_at)),
            )
            .filter(allocations::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&txn)
            .await?;

        let changed = reconciliation.changed_since(&current);
        let timestamp = now();
        for allocation in &changed {
            allocations::ActiveModel {
                id: Unchanged(allocation.id.into()),
                spent_amount: Set(allocation.spent_amount),
                remaining_amount: Set(allocation.remaining_amount),
                updated_at: Set(timestamp),
                ..Default::default()
            }
            .update(&txn)
            .await?;
        }

        convert::snapshot_row(&reconciliation.snapshot)?
            .insert(&txn)
            .await?;

        txn.commit().await?;

        let snapshot = &reconciliation.snapshot;
        info!(
            budget_id = %budget_id,
            allocations = reconciliation.allocations.len(),
            changed = changed.len(),
            total_spent = %snapshot.total_spent,
            variance_percentage = %snapshot.variance_percentage,
            overspent = snapshot.overspent_allocations,
            "Budget spending recalculated"
        );
        Ok(reconciliation)
    }

    /// Describes every budget whose period accepts actuals on `entry_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn coverage_on(
        &self,
        organization_id: OrganizationId,
        entry_date: NaiveDate,
    ) -> Result<Vec<BudgetCoverage>, BudgetRepoError> {
        let periods = budget_periods::Entity::find()
            .filter(budget_periods::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(budget_periods::Column::StartDate.lte(entry_date))
            .filter(budget_periods::Column::EndDate.gte(entry_date))
            .filter(budget_periods::Column::Status.is_in([PeriodStatus::Approved, PeriodStatus::Active]))
            .all(&self.db)
            .await?;
        if periods.is_empty() {
            return Ok(Vec::new());
        }

        let period_by_id: HashMap<Uuid, budget_periods::Model> =
            periods.into_iter().map(|p| (p.id, p)).collect();

        let budget_rows = budgets::Entity::find()
            .filter(budgets::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(budgets::Column::PeriodId.is_in(period_by_id.keys().copied()))
            .order_by_asc(budgets::Column::CreatedAt)
            .order_by_asc(budgets::Column::Id)
            .all(&self.db)
            .await?;

        let allocated = allocations::Entity::find()
            .filter(allocations::Column::BudgetId.is_in(budget_rows.iter().map(|b| b.id)))
            .select_only()
            .column(allocations::Column::BudgetId)
            .column(allocations::Column::AccountId)
            .into_tuple::<(Uuid, Uuid)>()
            .all(&self.db)
            .await?;

        let mut accounts_by_budget: HashMap<Uuid, Vec<AccountId>> = HashMap::new();
        for (budget_id, account_id) in allocated {
            accounts_by_budget
                .entry(budget_id)
                .or_default()
                .push(AccountId::from(account_id));
        }

        let coverage = budget_rows
            .into_iter()
            .filter_map(|budget| {
                let period = period_by_id.get(&budget.period_id)?;
                Some(BudgetCoverage {
                    budget_id: budget.id.into(),
                    period_status: period.status.into(),
                    start_date: period.start_date,
                    end_date: period.end_date,
                    account_ids: accounts_by_budget.remove(&budget.id).unwrap_or_default(),
                })
            })
            .collect();

        Ok(coverage)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Budget vs actual per allocation, from stored figures.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist, or
    /// `BudgetError::AccountNotFound` if an allocation's account is missing.
    pub async fn budget_vs_actual(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
    ) -> Result<BudgetVsActualReport, BudgetRepoError> {
        let budget: Budget = find_budget(&self.db, organization_id, budget_id)
            .await?
            .into();
        let period: BudgetPeriod = find_period(&self.db, organization_id, budget.period_id)
            .await?
            .into();
        let allocations: Vec<Allocation> = load_allocations(&self.db, budget_id)
            .await?
            .into_iter()
            .map(Allocation::from)
            .collect();

        let accounts = load_accounts(&self.db, organization_id, &allocations).await?;

        let lines = allocations
            .iter()
            .map(|allocation| {
                let account = accounts
                    .get(&allocation.account_id)
                    .ok_or(BudgetError::AccountNotFound(allocation.account_id))?;
                Ok(BudgetService::report_line(
                    allocation,
                    &account.code,
                    &account.name,
                ))
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        Ok(BudgetService::report(&budget, &period, lines))
    }

    /// Snapshot history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist.
    pub async fn list_snapshots(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
        page: &PageRequest,
    ) -> Result<PageResponse<MonitoringSnapshot>, BudgetRepoError> {
        find_budget(&self.db, organization_id, budget_id).await?;
        let page = page.normalized();

        let query = monitoring_snapshots::Entity::find()
            .filter(monitoring_snapshots::Column::BudgetId.eq(budget_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(monitoring_snapshots::Column::CapturedAt)
            .order_by_desc(monitoring_snapshots::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            rows.into_iter()
                .map(MonitoringSnapshot::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            page.page,
            page.per_page,
            total,
        ))
    }

    /// Most recent snapshot, if any recalculation has run.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist.
    pub async fn latest_snapshot(
        &self,
        organization_id: OrganizationId,
        budget_id: BudgetId,
    ) -> Result<Option<MonitoringSnapshot>, BudgetRepoError> {
        find_budget(&self.db, organization_id, budget_id).await?;

        let row = monitoring_snapshots::Entity::find()
            .filter(monitoring_snapshots::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_desc(monitoring_snapshots::Column::CapturedAt)
            .order_by_desc(monitoring_snapshots::Column::Id)
            .one(&self.db)
            .await?;

        Ok(row.map(MonitoringSnapshot::try_from).transpose()?)
    }
}

async fn find_budget<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    budget_id: BudgetId,
) -> Result<budgets::Model, BudgetRepoError> {
    budgets::Entity::find_by_id(budget_id.into_inner())
        .filter(budgets::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| BudgetError::NotFound(budget_id).into())
}

async fn load_allocations<C: ConnectionTrait>(
    conn: &C,
    budget_id: BudgetId,
) -> Result<Vec<allocations::Model>, DbErr> {
    allocations::Entity::find()
        .filter(allocations::Column::BudgetId.eq(budget_id.into_inner()))
        .order_by_asc(allocations::Column::CreatedAt)
        .order_by_asc(allocations::Column::Id)
        .all(conn)
        .await
}

/// Accounts behind the allocations that exist in the organization.
async fn load_accounts<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    allocations: &[Allocation],
) -> Result<HashMap<AccountId, accounts::Model>, DbErr> {
    if allocations.is_empty() {
        return Ok(HashMap::new());
    }

    let ids: Vec<Uuid> = allocations.iter().map(|a| a.account_id.into_inner()).collect();
    let rows = accounts::Entity::find()
        .filter(accounts::Column::OrganizationId.eq(organization_id.into_inner()))
        .filter(accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|a| (AccountId::from(a.id), a)).collect())
}

/// Sums posted lines per allocated account over the period (inclusive).
///
/// Accounts missing from the organization are left out, which the
/// reconciliation reports as `AccountNotFound`.
async fn load_activity<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    period: &BudgetPeriod,
    allocations: &[Allocation],
) -> Result<HashMap<AccountId, AccountActivity>, DbErr> {
    let accounts = load_accounts(conn, organization_id, allocations).await?;
    if accounts.is_empty() {
        return Ok(HashMap::new());
    }

    let mut activity: HashMap<AccountId, AccountActivity> = accounts
        .iter()
        .map(|(id, account)| {
            let account_type: AccountType = account.account_type.into();
            (
                *id,
                AccountActivity {
                    normal_balance: account_type.normal_balance(),
                    totals: AccountTotals::ZERO,
                },
            )
        })
        .collect();

    let lines = journal_lines::Entity::find()
        .inner_join(journal_entries::Entity)
        .filter(journal_entries::Column::OrganizationId.eq(organization_id.into_inner()))
        .filter(journal_entries::Column::Status.eq(EntryStatus::Posted))
        .filter(journal_entries::Column::EntryDate.between(period.start_date, period.end_date))
        .filter(journal_lines::Column::AccountId.is_in(accounts.keys().map(|id| id.into_inner())))
        .all(conn)
        .await?;

    for line in lines {
        if let Some(account) = activity.get_mut(&AccountId::from(line.account_id)) {
            account.totals += AccountTotals::new(line.debit, line.credit);
        }
    }

    debug!(
        period_id = %period.id,
        accounts = activity.len(),
        "Loaded posted ledger activity"
    );
    Ok(activity)
}
