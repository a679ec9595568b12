//! `SeaORM` Entity for budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BudgetType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub period_id: Uuid,
    pub name: String,
    pub budget_type: BudgetType,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget_periods::Entity",
        from = "Column::PeriodId",
        to = "super::budget_periods::Column::Id"
    )]
    BudgetPeriods,
    #[sea_orm(has_many = "super::allocations::Entity")]
    Allocations,
    #[sea_orm(has_many = "super::monitoring_snapshots::Entity")]
    MonitoringSnapshots,
}

impl Related<super::budget_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetPeriods.def()
    }
}

impl Related<super::allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl Related<super::monitoring_snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoringSnapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
