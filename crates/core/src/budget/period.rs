//! Budget periods and their lifecycle.

use std::fmt;
use std::str::FromStr;

use budgetline_shared::types::{BudgetPeriodId, OrganizationId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;

/// Budget period status.
///
/// Lifecycle: draft → approved → active → closed, or draft → closed when a
/// period is abandoned before approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriodStatus {
    /// Being prepared.
    Draft,
    /// Signed off, not yet running.
    Approved,
    /// Running.
    Active,
    /// Finished; budgets are frozen.
    Closed,
}

impl BudgetPeriodStatus {
    /// Returns true if moving to `next` follows the lifecycle.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Approved | Self::Closed)
                | (Self::Approved, Self::Active)
                | (Self::Active, Self::Closed)
        )
    }

    /// Returns true if posted ledger activity should refresh budgets in this period.
    #[must_use]
    pub const fn accepts_actuals(self) -> bool {
        matches!(self, Self::Approved | Self::Active)
    }

    /// Returns true if budgets in this period are frozen.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for BudgetPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriodStatus {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(BudgetError::InvalidPeriodStatus(s.to_string())),
        }
    }
}

/// A dated budgeting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPeriod {
    /// Period ID.
    pub id: BudgetPeriodId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name (e.g. "FY2026 Q1").
    pub name: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: BudgetPeriodStatus,
}

impl BudgetPeriod {
    /// Returns true if `date` falls within the period (inclusive).
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Validates and returns the period moved to `next`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidStatusTransition` if the lifecycle forbids it.
    pub fn transition(&self, next: BudgetPeriodStatus) -> Result<BudgetPeriodStatus, BudgetError> {
        if self.status.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BudgetError::InvalidStatusTransition {
                from: self.status,
                to: next,
            })
        }
    }
}

/// Input for creating a budget period.
#[derive(Debug, Clone)]
pub struct CreateBudgetPeriodInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
}

impl CreateBudgetPeriodInput {
    /// Validates the date range.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidDateRange` if `end_date < start_date`.
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.end_date < self.start_date {
            return Err(BudgetError::InvalidDateRange);
        }
        Ok(())
    }
}
