//! Double-entry ledger primitives used by the budget engine.
//!
//! This module covers the parts of bookkeeping the reconciliation needs:
//! - Account types and their normal-balance side
//! - Journal entries, lines, and their posting lifecycle
//! - Debit/credit aggregation
//! - Posting validation

pub mod balance;
pub mod entry;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{AccountTotals, NormalBalance};
pub use entry::{JournalEntry, JournalLine, JournalLineInput};
pub use error::LedgerError;
pub use types::{
    Account, AccountType, CreateAccountInput, CreateJournalEntryInput, EntrySource,
    JournalEntryStatus,
};
pub use validation::{validate_account_input, validate_lines, validate_status_change};
