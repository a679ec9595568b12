//! `SeaORM` entity definitions.

pub mod accounts;
pub mod allocations;
pub mod budget_periods;
pub mod budgets;
pub mod journal_entries;
pub mod journal_lines;
pub mod monitoring_snapshots;
pub mod organizations;
pub mod sea_orm_active_enums;
