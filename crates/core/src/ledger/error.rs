//! Ledger error types.

use budgetline_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::JournalEntryStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Line amount has more decimal places than money columns keep.
    #[error("Line amount {0} has more than 4 decimal places")]
    ExcessPrecision(Decimal),

    /// Line must carry either a debit or a credit, not both and not neither.
    #[error("Line must specify either debit or credit, not both")]
    InvalidLineSide,

    /// Account code is blank.
    #[error("Account code cannot be empty")]
    EmptyAccountCode,

    /// Unknown account type string.
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    /// Unknown entry status string.
    #[error("Invalid journal entry status: {0}")]
    InvalidStatus(String),

    /// Unknown entry source string.
    #[error("Invalid journal entry source: {0}")]
    InvalidSource(String),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account code already used in the organization.
    #[error("Account code already exists: {0}")]
    DuplicateAccountCode(String),

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Status change not allowed from the current state.
    #[error("Cannot change journal entry from {from} to {to}")]
    InvalidStatusChange {
        /// Current status.
        from: JournalEntryStatus,
        /// Requested status.
        to: JournalEntryStatus,
    },
}

impl From<LedgerError> for budgetline_shared::AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::AccountNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::DuplicateAccountCode(_) => Self::Conflict(message),
            LedgerError::AccountInactive(_) | LedgerError::InvalidStatusChange { .. } => {
                Self::BusinessRule(message)
            }
            LedgerError::InsufficientLines
            | LedgerError::Unbalanced { .. }
            | LedgerError::NegativeAmount
            | LedgerError::ExcessPrecision(_)
            | LedgerError::InvalidLineSide
            | LedgerError::EmptyAccountCode
            | LedgerError::InvalidAccountType(_)
            | LedgerError::InvalidStatus(_)
            | LedgerError::InvalidSource(_) => Self::Validation(message),
        }
    }
}
