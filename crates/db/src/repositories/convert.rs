//! Row-to-domain conversions.

use budgetline_core::budget::{Allocation, Budget, BudgetPeriod, MonitoringSnapshot};
use budgetline_core::ledger::{Account, JournalEntry, JournalLine};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::entities::{
    accounts, allocations, budget_periods, budgets, journal_entries, journal_lines,
    monitoring_snapshots,
};

pub(crate) fn utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id.into(),
            organization_id: model.organization_id.into(),
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            is_active: model.is_active,
        }
    }
}

impl From<journal_lines::Model> for JournalLine {
    fn from(model: journal_lines::Model) -> Self {
        Self {
            id: model.id.into(),
            entry_id: model.entry_id.into(),
            account_id: model.account_id.into(),
            debit: model.debit,
            credit: model.credit,
            memo: model.memo,
        }
    }
}

pub(crate) fn journal_entry(
    model: journal_entries::Model,
    lines: Vec<journal_lines::Model>,
) -> JournalEntry {
    JournalEntry {
        id: model.id.into(),
        organization_id: model.organization_id.into(),
        entry_date: model.entry_date,
        reference: model.reference,
        description: model.description,
        source: model.source.into(),
        status: model.status.into(),
        posted_at: model.posted_at.map(utc),
        lines: lines.into_iter().map(JournalLine::from).collect(),
    }
}

impl From<budget_periods::Model> for BudgetPeriod {
    fn from(model: budget_periods::Model) -> Self {
        Self {
            id: model.id.into(),
            organization_id: model.organization_id.into(),
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
        }
    }
}

impl From<budgets::Model> for Budget {
    fn from(model: budgets::Model) -> Self {
        Self {
            id: model.id.into(),
            organization_id: model.organization_id.into(),
            period_id: model.period_id.into(),
            name: model.name,
            budget_type: model.budget_type.into(),
            currency: model.currency,
            total_amount: model.total_amount,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

impl From<allocations::Model> for Allocation {
    fn from(model: allocations::Model) -> Self {
        Self {
            id: model.id.into(),
            budget_id: model.budget_id.into(),
            account_id: model.account_id.into(),
            allocated_amount: model.allocated_amount,
            spent_amount: model.spent_amount,
            remaining_amount: model.remaining_amount,
            last_calculated_at: model.last_calculated_at.map(utc),
        }
    }
}

impl TryFrom<monitoring_snapshots::Model> for MonitoringSnapshot {
    type Error = DbErr;

    fn try_from(model: monitoring_snapshots::Model) -> Result<Self, Self::Error> {
        let overspent_allocations = u32::try_from(model.overspent_allocations).map_err(|_| {
            DbErr::Type(format!(
                "snapshot {} has negative overspent_allocations {}",
                model.id, model.overspent_allocations
            ))
        })?;

        Ok(Self {
            id: model.id.into(),
            budget_id: model.budget_id.into(),
            organization_id: model.organization_id.into(),
            total_allocated: model.total_allocated,
            total_spent: model.total_spent,
            total_remaining: model.total_remaining,
            variance_amount: model.variance_amount,
            variance_percentage: model.variance_percentage,
            overspent_allocations,
            captured_at: utc(model.captured_at),
        })
    }
}

/// Row for a new snapshot.
///
/// # Errors
///
/// Returns `DbErr::Type` if the overspent count does not fit the column.
pub(crate) fn snapshot_row(
    snapshot: &MonitoringSnapshot,
) -> Result<monitoring_snapshots::ActiveModel, DbErr> {
    use sea_orm::Set;

    let overspent_allocations = i32::try_from(snapshot.overspent_allocations).map_err(|_| {
        DbErr::Type(format!(
            "overspent_allocations {} exceeds column range",
            snapshot.overspent_allocations
        ))
    })?;

    Ok(monitoring_snapshots::ActiveModel {
        id: Set(snapshot.id.into()),
        budget_id: Set(snapshot.budget_id.into()),
        organization_id: Set(snapshot.organization_id.into()),
        total_allocated: Set(snapshot.total_allocated),
        total_spent: Set(snapshot.total_spent),
        total_remaining: Set(snapshot.total_remaining),
        variance_amount: Set(snapshot.variance_amount),
        variance_percentage: Set(snapshot.variance_percentage),
        overspent_allocations: Set(overspent_allocations),
        captured_at: Set(snapshot.captured_at.into()),
    })
}
