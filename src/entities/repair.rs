use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One device's journey through the shop.
///
/// `total_charges` is a cache of the charge-ledger sum, recomputed inside the
/// same transaction as every ledger mutation. `staff_share_amount` and
/// `shop_share_amount` stay zero until the bill locks at full payment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Repair)]
#[sea_orm(table_name = "repairs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub token: String,

    pub customer_id: Uuid,
    pub device_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub status: String,
    pub intake_notes: Option<String>,
    pub flat_charge: Decimal,
    pub total_charges: Decimal,
    pub staff_share_amount: Decimal,
    pub shop_share_amount: Decimal,
    pub is_locked: bool,
    pub intake_at: DateTime<Utc>,
    pub to_repair_at: Option<DateTime<Utc>>,
    pub in_repair_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id"
    )]
    Device,
    #[sea_orm(has_many = "super::charge::Entity")]
    Charges,
    #[sea_orm(has_many = "super::inventory_usage::Entity")]
    InventoryUsages,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl Related<super::charge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charges.def()
    }
}

impl Related<super::inventory_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryUsages.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
