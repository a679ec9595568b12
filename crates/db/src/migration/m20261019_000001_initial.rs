//! Initial schema: tenants, chart of accounts, journal, budgets, snapshots.

use budgetline_core::MONEY_SCALE;
use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Total digits for money columns. sea-query rejects SQLite decimals wider than 16.
fn money_precision(backend: DbBackend) -> u32 {
    if matches!(backend, DbBackend::Sqlite) {
        16
    } else {
        19
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let money = money_precision(manager.get_database_backend());

        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organizations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Organizations::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Organizations::BaseCurrency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Accounts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-organization_id")
                            .from(Accounts::Table, Accounts::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-accounts-organization_id-code")
                    .table(Accounts::Table)
                    .col(Accounts::OrganizationId)
                    .col(Accounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntries::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Reference).string_len(100))
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Source).string_len(32).not_null())
                    .col(ColumnDef::new(JournalEntries::Status).string_len(16).not_null())
                    .col(ColumnDef::new(JournalEntries::PostedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::VoidedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_entries-organization_id")
                            .from(JournalEntries::Table, JournalEntries::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal_entries-organization_id-status-entry_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::OrganizationId)
                    .col(JournalEntries::Status)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::Debit).decimal_len(money, MONEY_SCALE).not_null())
                    .col(ColumnDef::new(JournalLines::Credit).decimal_len(money, MONEY_SCALE).not_null())
                    .col(ColumnDef::new(JournalLines::Memo).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_lines-entry_id")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_lines-account_id")
                            .from(JournalLines::Table, JournalLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal_lines-account_id")
                    .table(JournalLines::Table)
                    .col(JournalLines::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BudgetPeriods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BudgetPeriods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BudgetPeriods::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(BudgetPeriods::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BudgetPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(BudgetPeriods::EndDate).date().not_null())
                    .col(ColumnDef::new(BudgetPeriods::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(BudgetPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetPeriods::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_periods-organization_id")
                            .from(BudgetPeriods::Table, BudgetPeriods::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Budgets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Budgets::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Budgets::PeriodId).uuid().not_null())
                    .col(ColumnDef::new(Budgets::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Budgets::BudgetType).string_len(16).not_null())
                    .col(ColumnDef::new(Budgets::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Budgets::TotalAmount).decimal_len(money, MONEY_SCALE).not_null())
                    .col(
                        ColumnDef::new(Budgets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Budgets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-period_id")
                            .from(Budgets::Table, Budgets::PeriodId)
                            .to(BudgetPeriods::Table, BudgetPeriods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-budgets-period_id-name")
                    .table(Budgets::Table)
                    .col(Budgets::PeriodId)
                    .col(Budgets::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Allocations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Allocations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Allocations::BudgetId).uuid().not_null())
                    .col(ColumnDef::new(Allocations::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(Allocations::AllocatedAmount)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::SpentAmount)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::RemainingAmount)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Allocations::LastCalculatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Allocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-allocations-budget_id")
                            .from(Allocations::Table, Allocations::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-allocations-account_id")
                            .from(Allocations::Table, Allocations::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-allocations-budget_id-account_id")
                    .table(Allocations::Table)
                    .col(Allocations::BudgetId)
                    .col(Allocations::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonitoringSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoringSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitoringSnapshots::BudgetId).uuid().not_null())
                    .col(ColumnDef::new(MonitoringSnapshots::OrganizationId).uuid().not_null())
                    .col(
                        ColumnDef::new(MonitoringSnapshots::TotalAllocated)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::TotalSpent)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::TotalRemaining)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::VarianceAmount)
                            .decimal_len(money, MONEY_SCALE)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::VariancePercentage)
                            .decimal_len(money, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::OverspentAllocations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonitoringSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-monitoring_snapshots-budget_id")
                            .from(MonitoringSnapshots::Table, MonitoringSnapshots::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-monitoring_snapshots-budget_id-captured_at")
                    .table(MonitoringSnapshots::Table)
                    .col(MonitoringSnapshots::BudgetId)
                    .col(MonitoringSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            MonitoringSnapshots::Table.into_iden(),
            Allocations::Table.into_iden(),
            Budgets::Table.into_iden(),
            BudgetPeriods::Table.into_iden(),
            JournalLines::Table.into_iden(),
            JournalEntries::Table.into_iden(),
            Accounts::Table.into_iden(),
            Organizations::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    BaseCurrency,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    OrganizationId,
    Code,
    Name,
    AccountType,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    OrganizationId,
    EntryDate,
    Reference,
    Description,
    Source,
    Status,
    PostedAt,
    VoidedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    EntryId,
    AccountId,
    Debit,
    Credit,
    Memo,
}

#[derive(DeriveIden)]
enum BudgetPeriods {
    Table,
    Id,
    OrganizationId,
    Name,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Budgets {
    Table,
    Id,
    OrganizationId,
    PeriodId,
    Name,
    BudgetType,
    Currency,
    TotalAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Allocations {
    Table,
    Id,
    BudgetId,
    AccountId,
    AllocatedAmount,
    SpentAmount,
    RemainingAmount,
    LastCalculatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MonitoringSnapshots {
    Table,
    Id,
    BudgetId,
    OrganizationId,
    TotalAllocated,
    TotalSpent,
    TotalRemaining,
    VarianceAmount,
    VariancePercentage,
    OverspentAllocations,
    CapturedAt,
}
