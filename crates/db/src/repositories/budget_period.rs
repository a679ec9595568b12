//! Budget period repository.

use budgetline_core::budget::{
    BudgetError, BudgetPeriod, BudgetPeriodStatus, CreateBudgetPeriodInput,
};
use budgetline_shared::types::{BudgetPeriodId, OrganizationId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::budget::BudgetRepoError;
use super::convert::now;
use crate::entities::{budget_periods, organizations, sea_orm_active_enums::PeriodStatus};

/// Budget period repository.
#[derive(Debug, Clone)]
pub struct BudgetPeriodRepository {
    db: DatabaseConnection,
}

impl BudgetPeriodRepository {
    /// Creates a new budget period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a period in `draft` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the date range is inverted or the organization
    /// does not exist.
    pub async fn create_period(
        &self,
        input: CreateBudgetPeriodInput,
    ) -> Result<BudgetPeriod, BudgetRepoError> {
        input.validate()?;

        let organization = organizations::Entity::find_by_id(input.organization_id.into_inner())
            .one(&self.db)
            .await?;
        if organization.is_none() {
            return Err(BudgetRepoError::OrganizationNotFound(input.organization_id));
        }

        let timestamp = now();
        let model = budget_periods::ActiveModel {
            id: Set(BudgetPeriodId::new().into()),
            organization_id: Set(input.organization_id.into()),
            name: Set(input.name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(PeriodStatus::Draft),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&self.db)
        .await?;

        Ok(model.into())
    }

    /// Gets a period in an organization.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::PeriodNotFound` if it does not exist.
    pub async fn get_period(
        &self,
        organization_id: OrganizationId,
        period_id: BudgetPeriodId,
    ) -> Result<BudgetPeriod, BudgetRepoError> {
        Ok(find_period(&self.db, organization_id, period_id).await?.into())
    }

    /// Lists an organization's periods, latest start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<BudgetPeriod>, BudgetRepoError> {
        let rows = budget_periods::Entity::find()
            .filter(budget_periods::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_desc(budget_periods::Column::StartDate)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(BudgetPeriod::from).collect())
    }

    /// Moves a period along its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidStatusTransition` for transitions outside
    /// draft → approved → active → closed (or draft → closed).
    pub async fn transition_status(
        &self,
        organization_id: OrganizationId,
        period_id: BudgetPeriodId,
        next: BudgetPeriodStatus,
    ) -> Result<BudgetPeriod, BudgetRepoError> {
        let model = find_period(&self.db, organization_id, period_id).await?;
        let period = BudgetPeriod::from(model.clone());
        let next = period.transition(next)?;

        let mut active: budget_periods::ActiveModel = model.into();
        active.status = Set(next.into());
        active.updated_at = Set(now());
        let updated = active.update(&self.db).await?;

        info!(
            period_id = %period_id,
            from = %period.status,
            to = %next,
            "Budget period status changed"
        );
        Ok(updated.into())
    }
}

pub(crate) async fn find_period<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    period_id: BudgetPeriodId,
) -> Result<budget_periods::Model, BudgetRepoError> {
    budget_periods::Entity::find_by_id(period_id.into_inner())
        .filter(budget_periods::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await
        .map_err(BudgetRepoError::from)?
        .ok_or_else(|| BudgetError::PeriodNotFound(period_id).into())
}
