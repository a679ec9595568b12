//! Journal repository: draft entries, posting, voiding.
//!
//! Posting and voiding commit first, then dispatch a [`LedgerEvent`] so
//! budget recalculation sees the new ledger state.

use std::collections::HashMap;

use budgetline_core::events::{EntryChange, EventDispatcher, EventError, EventOutcome, LedgerEvent};
use budgetline_core::ledger::{
    CreateJournalEntryInput, JournalEntry, JournalEntryStatus, JournalLineInput, LedgerError,
    validate_lines, validate_status_change,
};
use budgetline_shared::AppError;
use budgetline_shared::types::{AccountId, JournalEntryId, JournalLineId, OrganizationId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::convert::{self, now};
use crate::entities::{accounts, journal_entries, journal_lines, sea_orm_active_enums::EntryStatus};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Entry committed but a downstream handler failed.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Ledger(e) => e.into(),
            JournalError::Event(EventError::Budget(e)) => e.into(),
            JournalError::Event(EventError::Handler(message)) => Self::Internal(message),
            JournalError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A posted or voided entry together with what its event triggered.
#[derive(Debug, Clone)]
pub struct PostingResult {
    /// The entry after the status change.
    pub entry: JournalEntry,
    /// Handler outcome (recalculated budgets).
    pub outcome: EventOutcome,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    events: EventDispatcher,
}

impl JournalRepository {
    /// Creates a new journal repository that dispatches to `events`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, events: EventDispatcher) -> Self {
        Self { db, events }
    }

    /// Creates a draft entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines are malformed or reference accounts
    /// outside the organization.
    pub async fn create_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<JournalEntry, JournalError> {
        validate_lines(&input.lines)?;

        let txn = self.db.begin().await?;
        load_accounts(&txn, input.organization_id, &input.lines).await?;

        let entry_id = JournalEntryId::new();
        let header = journal_entries::ActiveModel {
            id: Set(entry_id.into()),
            organization_id: Set(input.organization_id.into()),
            entry_date: Set(input.entry_date),
            reference: Set(input.reference),
            description: Set(input.description),
            source: Set(input.source.into()),
            status: Set(EntryStatus::Draft),
            posted_at: Set(None),
            voided_at: Set(None),
            created_at: Set(now()),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let model = journal_lines::ActiveModel {
                id: Set(JournalLineId::new().into()),
                entry_id: Set(entry_id.into()),
                account_id: Set(line.account_id.into()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo),
            }
            .insert(&txn)
            .await?;
            lines.push(model);
        }

        txn.commit().await?;

        debug!(entry_id = %entry_id, lines = lines.len(), "Draft journal entry created");
        Ok(convert::journal_entry(header, lines))
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EntryNotFound` if the entry does not exist in the
    /// organization.
    pub async fn get_entry(
        &self,
        organization_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, JournalError> {
        let (header, lines) = load_entry(&self.db, organization_id, entry_id).await?;
        Ok(convert::journal_entry(header, lines))
    }

    /// Posts a draft entry and dispatches `EntryPosted`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry is not a draft
    /// - The lines do not balance
    /// - An account is missing or inactive
    /// - An event handler fails (the entry stays posted)
    pub async fn post_entry(
        &self,
        organization_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> Result<PostingResult, JournalError> {
        let txn = self.db.begin().await?;
        let (header, lines) = load_entry(&txn, organization_id, entry_id).await?;

        validate_status_change(header.status.into(), JournalEntryStatus::Posted)?;

        let inputs: Vec<JournalLineInput> = lines
            .iter()
            .map(|line| JournalLineInput {
                account_id: line.account_id.into(),
                debit: line.debit,
                credit: line.credit,
                memo: line.memo.clone(),
            })
            .collect();
        validate_lines(&inputs)?;

        let accounts = load_accounts(&txn, organization_id, &inputs).await?;
        if let Some(inactive) = accounts.values().find(|a| !a.is_active) {
            return Err(LedgerError::AccountInactive(inactive.id.into()).into());
        }

        let mut active: journal_entries::ActiveModel = header.into();
        active.status = Set(EntryStatus::Posted);
        active.posted_at = Set(Some(now()));
        let header = active.update(&txn).await?;

        txn.commit().await?;

        let entry = convert::journal_entry(header, lines);
        let outcome = self
            .events
            .dispatch(&LedgerEvent::EntryPosted(EntryChange::from(&entry)))
            .await?;

        info!(
            entry_id = %entry.id,
            recalculated = outcome.recalculated.len(),
            "Journal entry posted"
        );
        Ok(PostingResult { entry, outcome })
    }

    /// Voids a posted entry and dispatches `EntryVoided`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not posted or an event handler fails.
    pub async fn void_entry(
        &self,
        organization_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> Result<PostingResult, JournalError> {
        let txn = self.db.begin().await?;
        let (header, lines) = load_entry(&txn, organization_id, entry_id).await?;

        validate_status_change(header.status.into(), JournalEntryStatus::Voided)?;

        let mut active: journal_entries::ActiveModel = header.into();
        active.status = Set(EntryStatus::Voided);
        active.voided_at = Set(Some(now()));
        let header = active.update(&txn).await?;

        txn.commit().await?;

        let entry = convert::journal_entry(header, lines);
        let outcome = self
            .events
            .dispatch(&LedgerEvent::EntryVoided(EntryChange::from(&entry)))
            .await?;

        info!(
            entry_id = %entry.id,
            recalculated = outcome.recalculated.len(),
            "Journal entry voided"
        );
        Ok(PostingResult { entry, outcome })
    }
}

async fn load_entry<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    entry_id: JournalEntryId,
) -> Result<(journal_entries::Model, Vec<journal_lines::Model>), JournalError> {
    let header = journal_entries::Entity::find_by_id(entry_id.into_inner())
        .filter(journal_entries::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;

    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id.into_inner()))
        .order_by_asc(journal_lines::Column::Id)
        .all(conn)
        .await?;

    Ok((header, lines))
}

/// Loads every account the lines reference, failing on the first unknown one.
async fn load_accounts<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    lines: &[JournalLineInput],
) -> Result<HashMap<AccountId, accounts::Model>, JournalError> {
    let ids: Vec<uuid::Uuid> = lines.iter().map(|l| l.account_id.into_inner()).collect();

    let found: HashMap<AccountId, accounts::Model> = accounts::Entity::find()
        .filter(accounts::Column::OrganizationId.eq(organization_id.into_inner()))
        .filter(accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (AccountId::from(a.id), a))
        .collect();

    if let Some(missing) = lines.iter().find(|l| !found.contains_key(&l.account_id)) {
        return Err(LedgerError::AccountNotFound(missing.account_id).into());
    }

    Ok(found)
}
