//! Business rule validation for ledger operations.

use rust_decimal::Decimal;

use super::balance::AccountTotals;
use super::entry::JournalLineInput;
use super::error::LedgerError;
use super::types::{CreateAccountInput, JournalEntryStatus};
use crate::money::exceeds_money_scale;

/// Validates journal lines and returns their totals.
///
/// Rules: at least two lines, no negative amounts, at most four decimal
/// places, exactly one positive side per line, debits equal credits.
///
/// # Errors
///
/// Returns the first rule the lines violate.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<AccountTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut totals = AccountTotals::ZERO;

    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        for amount in [line.debit, line.credit] {
            if exceeds_money_scale(amount) {
                return Err(LedgerError::ExcessPrecision(amount));
            }
        }

        let has_debit = line.debit > Decimal::ZERO;
        let has_credit = line.credit > Decimal::ZERO;
        if has_debit == has_credit {
            return Err(LedgerError::InvalidLineSide);
        }

        totals += AccountTotals::new(line.debit, line.credit);
    }

    if !totals.is_balanced() {
        return Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

/// Validates a journal entry status change.
///
/// Allowed: draft → posted, posted → voided.
///
/// # Errors
///
/// Returns `LedgerError::InvalidStatusChange` for anything else.
pub fn validate_status_change(
    from: JournalEntryStatus,
    to: JournalEntryStatus,
) -> Result<(), LedgerError> {
    match (from, to) {
        (JournalEntryStatus::Draft, JournalEntryStatus::Posted)
        | (JournalEntryStatus::Posted, JournalEntryStatus::Voided) => Ok(()),
        _ => Err(LedgerError::InvalidStatusChange { from, to }),
    }
}

/// Validates account creation input.
///
/// # Errors
///
/// Returns `LedgerError::EmptyAccountCode` if the code is blank.
pub fn validate_account_input(input: &CreateAccountInput) -> Result<(), LedgerError> {
    if input.code.trim().is_empty() {
        return Err(LedgerError::EmptyAccountCode);
    }
    Ok(())
}
