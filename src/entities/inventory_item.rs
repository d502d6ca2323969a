use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Stock-keeping record. `quantity` must never go negative; the decrement in
/// inventory consumption is issued as a guarded conditional update.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = InventoryItem)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,

    #[sea_orm(unique)]
    pub sku: Option<String>,

    pub quantity: i32,
    pub unit_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_usage::Entity")]
    InventoryUsages,
}

impl Related<super::inventory_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
