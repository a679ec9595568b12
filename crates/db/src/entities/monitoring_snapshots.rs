//! `SeaORM` Entity for monitoring_snapshots table.
//!
//! Rows are append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monitoring_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub organization_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_allocated: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_spent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_remaining: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub variance_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub variance_percentage: Decimal,
    pub overspent_allocations: i32,
    pub captured_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_delete = "Cascade"
    )]
    Budgets,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
