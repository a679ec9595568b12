//! Ledger events and their dispatch to budget recalculation.
//!
//! Posting or voiding a journal entry produces a [`LedgerEvent`]. The
//! [`EventDispatcher`] hands it to every registered [`LedgerEventHandler`]
//! in-process; the persistence layer registers the handler that recalculates
//! the budgets the entry touches.

use std::sync::Arc;

use budgetline_shared::types::{AccountId, BudgetId, JournalEntryId, OrganizationId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::budget::{BudgetError, BudgetPeriodStatus};
use crate::ledger::{EntrySource, JournalEntry};

/// What changed about a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChange {
    /// Organization owning the entry.
    pub organization_id: OrganizationId,
    /// The entry.
    pub entry_id: JournalEntryId,
    /// Entry date, used to pick budget periods.
    pub entry_date: NaiveDate,
    /// Where the entry came from.
    pub source: EntrySource,
    /// Distinct accounts on the entry's lines.
    pub account_ids: Vec<AccountId>,
}

impl From<&JournalEntry> for EntryChange {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            organization_id: entry.organization_id,
            entry_id: entry.id,
            entry_date: entry.entry_date,
            source: entry.source,
            account_ids: entry.account_ids(),
        }
    }
}

/// Ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "entry", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A draft entry was posted.
    EntryPosted(EntryChange),
    /// A posted entry was voided.
    EntryVoided(EntryChange),
}

impl LedgerEvent {
    /// Returns the entry payload.
    #[must_use]
    pub const fn change(&self) -> &EntryChange {
        match self {
            Self::EntryPosted(change) | Self::EntryVoided(change) => change,
        }
    }

    /// Returns the event name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EntryPosted(_) => "entry_posted",
            Self::EntryVoided(_) => "entry_voided",
        }
    }
}

/// Result of handling an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    /// Budgets recalculated because of the event.
    pub recalculated: Vec<BudgetId>,
}

impl EventOutcome {
    /// Folds another handler's outcome into this one.
    pub fn merge(&mut self, other: Self) {
        for id in other.recalculated {
            if !self.recalculated.contains(&id) {
                self.recalculated.push(id);
            }
        }
    }
}

/// Event handling errors.
#[derive(Debug, Error)]
pub enum EventError {
    /// Recalculation rejected by budget rules.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Handler infrastructure failure (e.g. database).
    #[error("Event handler failed: {0}")]
    Handler(String),
}

/// Consumer of ledger events.
#[async_trait::async_trait]
pub trait LedgerEventHandler: Send + Sync {
    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler's side effects fail.
    async fn handle(&self, event: &LedgerEvent) -> Result<EventOutcome, EventError>;
}

/// Synchronous in-process fan-out of ledger events.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn LedgerEventHandler>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn LedgerEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler in registration order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub async fn dispatch(&self, event: &LedgerEvent) -> Result<EventOutcome, EventError> {
        let mut outcome = EventOutcome::default();
        for handler in &self.handlers {
            outcome.merge(handler.handle(event).await?);
        }
        Ok(outcome)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// What a budget covers, for matching against ledger events.
#[derive(Debug, Clone)]
pub struct BudgetCoverage {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Status of the budget's period.
    pub period_status: BudgetPeriodStatus,
    /// Period start (inclusive).
    pub start_date: NaiveDate,
    /// Period end (inclusive).
    pub end_date: NaiveDate,
    /// Accounts with an allocation in the budget.
    pub account_ids: Vec<AccountId>,
}

impl BudgetCoverage {
    /// Returns true if `change` should trigger a recalculation of this budget.
    #[must_use]
    pub fn is_affected_by(&self, change: &EntryChange) -> bool {
        self.period_status.accepts_actuals()
            && (self.start_date..=self.end_date).contains(&change.entry_date)
            && change.account_ids.iter().any(|id| self.account_ids.contains(id))
    }
}

/// Selects the budgets an event affects, in input order.
#[must_use]
pub fn affected_budgets(event: &LedgerEvent, coverage: &[BudgetCoverage]) -> Vec<BudgetId> {
    let change = event.change();
    coverage
        .iter()
        .filter(|budget| budget.is_affected_by(change))
        .map(|budget| budget.budget_id)
        .collect()
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
