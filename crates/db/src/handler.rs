//! Database-backed ledger event handler.

use budgetline_core::events::{
    EventError, EventOutcome, LedgerEvent, LedgerEventHandler, affected_budgets,
};
use tracing::{debug, warn};

use crate::repositories::{BudgetRepoError, BudgetRepository};

/// Recalculates every budget a posted or voided entry touches.
///
/// A budget is touched when its period accepts actuals, contains the entry
/// date, and allocates to one of the entry's accounts.
#[derive(Debug, Clone)]
pub struct BudgetEventHandler {
    budgets: BudgetRepository,
}

impl BudgetEventHandler {
    /// Creates a handler backed by `budgets`.
    #[must_use]
    pub const fn new(budgets: BudgetRepository) -> Self {
        Self { budgets }
    }
}

impl From<BudgetRepoError> for EventError {
    fn from(err: BudgetRepoError) -> Self {
        match err {
            BudgetRepoError::Budget(e) => Self::Budget(e),
            other => Self::Handler(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl LedgerEventHandler for BudgetEventHandler {
    async fn handle(&self, event: &LedgerEvent) -> Result<EventOutcome, EventError> {
        let change = event.change();
        let coverage = self
            .budgets
            .coverage_on(change.organization_id, change.entry_date)
            .await?;

        let budget_ids = affected_budgets(event, &coverage);
        debug!(
            event = event.name(),
            entry_id = %change.entry_id,
            candidates = coverage.len(),
            affected = budget_ids.len(),
            "Matching budgets for ledger event"
        );

        let mut outcome = EventOutcome::default();
        for budget_id in budget_ids {
            if let Err(e) = self
                .budgets
                .recalculate_spending(change.organization_id, budget_id)
                .await
            {
                warn!(budget_id = %budget_id, error = %e, "Budget recalculation failed");
                return Err(e.into());
            }
            outcome.recalculated.push(budget_id);
        }

        Ok(outcome)
    }
}
