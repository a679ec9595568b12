//! Journal entry and line domain types.

use budgetline_shared::types::{AccountId, JournalEntryId, JournalLineId, OrganizationId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::AccountTotals;
use super::types::{EntrySource, JournalEntryStatus};

/// A journal entry header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Optional document reference.
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Originating document type.
    pub source: EntrySource,
    /// Posting state.
    pub status: JournalEntryStatus,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Lines belonging to this entry.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Debit/credit totals across all lines.
    #[must_use]
    pub fn totals(&self) -> AccountTotals {
        self.lines.iter().map(JournalLine::totals).sum()
    }

    /// Distinct accounts touched by this entry, in first-seen order.
    #[must_use]
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if !ids.contains(&line.account_id) {
                ids.push(line.account_id);
            }
        }
        ids
    }
}

/// A single journal line.
///
/// Exactly one of `debit`/`credit` is positive; the other is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line ID.
    pub id: JournalLineId,
    /// Parent entry.
    pub entry_id: JournalEntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

impl JournalLine {
    /// This line's contribution to account totals.
    #[must_use]
    pub const fn totals(&self) -> AccountTotals {
        AccountTotals::new(self.debit, self.credit)
    }
}

/// Input for a single journal line.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// Account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero for a credit line).
    pub debit: Decimal,
    /// Credit amount (zero for a debit line).
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }

    /// Attaches a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}
