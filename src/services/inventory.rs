use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{charge, inventory_item, inventory_usage, repair},
    errors::ServiceError,
    events::{Event, EventSender},
    services::charges::{recalc_total, ChargeKind},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "Opening quantity must not be negative"))]
    #[serde(default)]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UseInventoryRequest {
    pub inventory_item_id: Uuid,
    pub quantity: i32,
    /// Staff member consuming the stock
    pub actor_id: Option<Uuid>,
}

/// Outcome of a successful inventory consumption: the usage row and the
/// ledger charge derived from it.
#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryUsageOutcome {
    pub usage: inventory_usage::Model,
    pub charge: charge::Model,
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    events: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(
        &self,
        request: CreateInventoryItemRequest,
    ) -> Result<inventory_item::Model, ServiceError> {
        request.validate()?;
        if request.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit price must not be negative".to_string(),
            ));
        }

        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            sku: Set(request.sku),
            quantity: Set(request.quantity),
            unit_price: Set(request.unit_price),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        info!(item_id = %item.id, "inventory item created");
        Ok(item)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        inventory_item::Entity::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })
    }

    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let paginator = inventory_item::Entity::find()
            .order_by_asc(inventory_item::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Adds stock to an active item.
    #[instrument(skip(self), fields(item_id = %item_id, quantity = quantity))]
    pub async fn restock(
        &self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Restock quantity must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let updated = inventory_item::Entity::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).add(quantity),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(item_id))
            .filter(inventory_item::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Inventory item {} not found",
                item_id
            )));
        }

        let item = inventory_item::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        txn.commit().await?;
        Ok(item)
    }

    /// Removes an item from circulation; existing usage history is untouched.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn deactivate(&self, item_id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;

        let mut active: inventory_item::ActiveModel = item.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        let item = active.update(&*self.db).await?;
        Ok(item)
    }

    /// Consumes stock for a repair: decrements the item, records the usage
    /// with the unit price frozen at time of use, appends the derived
    /// INVENTORY charge, and recomputes the repair total. One transaction;
    /// any failure rolls the whole sequence back, so a retry after a
    /// transient error starts from unchanged state.
    #[instrument(
        skip(self, request),
        fields(
            repair_id = %repair_id,
            inventory_item_id = %request.inventory_item_id,
            quantity = request.quantity,
        )
    )]
    pub async fn use_inventory(
        &self,
        repair_id: Uuid,
        request: UseInventoryRequest,
    ) -> Result<InventoryUsageOutcome, ServiceError> {
        if request.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        // Row lock on the repair serializes consumption against payment
        // locking on the same bill.
        let repair = repair::Entity::find_by_id(repair_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair {} not found", repair_id)))?;
        if repair.is_locked {
            return Err(ServiceError::BillLocked(repair_id));
        }

        let item = inventory_item::Entity::find_by_id(request.inventory_item_id)
            .one(&txn)
            .await?
            .filter(|item| item.is_active)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Inventory item {} not found",
                    request.inventory_item_id
                ))
            })?;

        if item.quantity < request.quantity {
            return Err(ServiceError::InsufficientStock {
                item_id: item.id,
                requested: request.quantity,
                available: item.quantity,
            });
        }

        let now = Utc::now();

        // Guarded decrement: the stock floor is enforced by the storage
        // layer, not by the read above. Zero rows affected means a
        // concurrent consumer won the race since our read.
        let decremented = inventory_item::Entity::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).sub(request.quantity),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(now))
            .filter(inventory_item::Column::Id.eq(item.id))
            .filter(inventory_item::Column::Quantity.gte(request.quantity))
            .exec(&txn)
            .await?;
        if decremented.rows_affected == 0 {
            warn!(item_id = %item.id, "stock decrement lost a concurrent race; rolling back");
            return Err(ServiceError::StockWentNegative(item.id));
        }

        // Safety net: re-read and verify the floor held.
        let after = inventory_item::Entity::find_by_id(item.id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "inventory item {} vanished mid-transaction",
                    item.id
                ))
            })?;
        if after.quantity < 0 {
            return Err(ServiceError::StockWentNegative(item.id));
        }

        let unit_price_at_use = item.unit_price;
        let usage = inventory_usage::ActiveModel {
            id: Set(Uuid::new_v4()),
            repair_id: Set(repair_id),
            inventory_item_id: Set(item.id),
            quantity: Set(request.quantity),
            unit_price: Set(unit_price_at_use),
            created_by: Set(request.actor_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let charge_amount = unit_price_at_use * Decimal::from(request.quantity);
        let charge = charge::ActiveModel {
            id: Set(Uuid::new_v4()),
            repair_id: Set(repair_id),
            kind: Set(ChargeKind::Inventory.to_string()),
            description: Set(format!("{} x{}", item.name, request.quantity)),
            amount: Set(charge_amount),
            inventory_usage_id: Set(Some(usage.id)),
            created_by: Set(request.actor_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        recalc_total(&txn, repair_id).await?;

        txn.commit().await?;

        info!(
            usage_id = %usage.id,
            charge_amount = %charge_amount,
            remaining = after.quantity,
            "inventory consumed"
        );

        if let Err(e) = self
            .events
            .send(Event::InventoryConsumed {
                repair_id,
                inventory_item_id: item.id,
                quantity: request.quantity,
                charge_amount,
            })
            .await
        {
            warn!(%repair_id, error = %e, "failed to emit inventory audit event");
        }

        Ok(InventoryUsageOutcome { usage, charge })
    }
}
