//! Account repository for chart of accounts database operations.

use budgetline_core::ledger::{Account, CreateAccountInput, LedgerError, validate_account_input};
use budgetline_shared::AppError;
use budgetline_shared::types::{AccountId, OrganizationId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::convert::now;
use crate::entities::{accounts, organizations};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Ledger(e) => e.into(),
            AccountError::OrganizationNotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new active account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is empty or already used in the organization
    /// - The organization does not exist
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, AccountError> {
        validate_account_input(&input)?;

        let organization = organizations::Entity::find_by_id(input.organization_id.into_inner())
            .one(&self.db)
            .await?;
        if organization.is_none() {
            return Err(AccountError::OrganizationNotFound(input.organization_id));
        }

        let existing = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(input.organization_id.into_inner()))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateAccountCode(input.code).into());
        }

        let model = accounts::ActiveModel {
            id: Set(AccountId::new().into()),
            organization_id: Set(input.organization_id.into()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            is_active: Set(true),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;

        debug!(account_id = %model.id, code = %model.code, "Account created");
        Ok(model.into())
    }

    /// Gets an account in an organization.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the account does not exist in
    /// the organization.
    pub async fn get_account(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
    ) -> Result<Account, AccountError> {
        find_account(&self.db, organization_id, account_id)
            .await?
            .map(Account::from)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id).into())
    }

    /// Lists an organization's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Account>, AccountError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Activates or deactivates an account.
    ///
    /// Inactive accounts cannot be posted to.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the account does not exist.
    pub async fn set_active(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
        is_active: bool,
    ) -> Result<Account, AccountError> {
        let model = find_account(&self.db, organization_id, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        let mut active: accounts::ActiveModel = model.into();
        active.is_active = Set(is_active);
        Ok(active.update(&self.db).await?.into())
    }
}

/// Loads an account scoped to an organization.
pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    account_id: AccountId,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(account_id.into_inner())
        .filter(accounts::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await
}
