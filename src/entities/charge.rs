use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One line item on a repair's bill. Rows are append-only: a charge is never
/// edited after insertion, and discounts are recorded as negative amounts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Charge)]
#[sea_orm(table_name = "charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub repair_id: Uuid,
    pub kind: String,
    pub description: String,
    pub amount: Decimal,
    pub inventory_usage_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repair::Entity",
        from = "Column::RepairId",
        to = "super::repair::Column::Id"
    )]
    Repair,
    #[sea_orm(
        belongs_to = "super::inventory_usage::Entity",
        from = "Column::InventoryUsageId",
        to = "super::inventory_usage::Column::Id"
    )]
    InventoryUsage,
}

impl Related<super::repair::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repair.def()
    }
}

impl Related<super::inventory_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryUsage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
