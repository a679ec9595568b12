//! String-backed enums shared by several entities.
//!
//! Stored as text so the same schema runs on PostgreSQL and SQLite.

use budgetline_core::budget::{BudgetPeriodStatus as CorePeriodStatus, BudgetType as CoreBudgetType};
use budgetline_core::ledger::{
    AccountType as CoreAccountType, EntrySource as CoreEntrySource,
    JournalEntryStatus as CoreEntryStatus,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "voided")]
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum EntrySource {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "sales_invoice")]
    SalesInvoice,
    #[sea_orm(string_value = "purchase_invoice")]
    PurchaseInvoice,
    #[sea_orm(string_value = "payment")]
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BudgetType {
    #[sea_orm(string_value = "operational")]
    Operational,
    #[sea_orm(string_value = "capital")]
    Capital,
    #[sea_orm(string_value = "cash_flow")]
    CashFlow,
}

macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType <=> CoreAccountType { Asset, Liability, Equity, Revenue, Expense });
mirror_enum!(EntryStatus <=> CoreEntryStatus { Draft, Posted, Voided });
mirror_enum!(EntrySource <=> CoreEntrySource { Manual, SalesInvoice, PurchaseInvoice, Payment });
mirror_enum!(PeriodStatus <=> CorePeriodStatus { Draft, Approved, Active, Closed });
mirror_enum!(BudgetType <=> CoreBudgetType { Operational, Capital, CashFlow });
