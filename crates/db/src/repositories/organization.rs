//! Organization repository for database operations.

use budgetline_shared::AppError;
use budgetline_shared::types::OrganizationId;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use super::convert::now;
use crate::entities::organizations;

/// Error types for organization operations.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Organization not found.
    #[error("Organization not found: {0}")]
    NotFound(OrganizationId),

    /// Base currency is not a 3-letter code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrganizationError> for AppError {
    fn from(err: OrganizationError) -> Self {
        match err {
            OrganizationError::NotFound(_) => Self::NotFound(err.to_string()),
            OrganizationError::InvalidCurrency(_) => Self::Validation(err.to_string()),
            OrganizationError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Organization repository.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is malformed or the insert fails.
    pub async fn create(
        &self,
        name: &str,
        base_currency: &str,
    ) -> Result<organizations::Model, OrganizationError> {
        if base_currency.len() != 3 || !base_currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(OrganizationError::InvalidCurrency(base_currency.to_string()));
        }

        let model = organizations::ActiveModel {
            id: Set(OrganizationId::new().into()),
            name: Set(name.to_string()),
            base_currency: Set(base_currency.to_string()),
            created_at: Set(now()),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Gets an organization, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationError::NotFound` if no such organization exists.
    pub async fn get(&self, id: OrganizationId) -> Result<organizations::Model, OrganizationError> {
        self.find_by_id(id)
            .await?
            .ok_or(OrganizationError::NotFound(id))
    }
}
