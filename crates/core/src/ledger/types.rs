//! Ledger domain types.

use std::fmt;
use std::str::FromStr;

use budgetline_shared::types::{AccountId, OrganizationId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::balance::NormalBalance;
use super::entry::JournalLineInput;
use super::error::LedgerError;

/// Chart-of-accounts classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owner's residual interest (credit-normal).
    Equity,
    /// Income earned (credit-normal).
    Revenue,
    /// Costs incurred (debit-normal).
    Expense,
}

impl AccountType {
    /// All account types, in chart-of-accounts order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the side on which this account type naturally increases.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::InvalidAccountType(s.to_string())),
        }
    }
}

/// Posting state of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Being drafted; does not affect balances.
    Draft,
    /// Posted to the ledger; counts toward actuals.
    Posted,
    /// Reversed after posting; no longer counts.
    Voided,
}

impl JournalEntryStatus {
    /// Returns true if the entry contributes to account actuals.
    #[must_use]
    pub const fn counts_toward_actuals(self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for JournalEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalEntryStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "voided" => Ok(Self::Voided),
            _ => Err(LedgerError::InvalidStatus(s.to_string())),
        }
    }
}

/// Business document that produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Manual journal.
    Manual,
    /// Customer invoice.
    SalesInvoice,
    /// Vendor bill.
    PurchaseInvoice,
    /// Incoming or outgoing payment.
    Payment,
}

impl EntrySource {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::SalesInvoice => "sales_invoice",
            Self::PurchaseInvoice => "purchase_invoice",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntrySource {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "sales_invoice" => Ok(Self::SalesInvoice),
            "purchase_invoice" => Ok(Self::PurchaseInvoice),
            "payment" => Ok(Self::Payment),
            _ => Err(LedgerError::InvalidSource(s.to_string())),
        }
    }
}

/// A chart-of-accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code (e.g. "6100").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
}

impl Account {
    /// Shortcut for `self.account_type.normal_balance()`.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code, unique per organization.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// Input for creating a draft journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Accounting date; decides which budget periods the entry falls into.
    pub entry_date: NaiveDate,
    /// Optional document reference (invoice number, receipt, ...).
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Originating document type.
    pub source: EntrySource,
    /// Lines; must balance before posting.
    pub lines: Vec<JournalLineInput>,
}
