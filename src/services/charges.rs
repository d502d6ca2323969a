use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{charge, repair},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Kinds of line items on a repair's bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    Inventory,
    Flat,
    Discount,
    Other,
}

/// Recomputes a repair's cached `total_charges` from its charge ledger.
///
/// Must run on the same connection/transaction as the ledger mutation it
/// follows so the cache is never stale at commit. Performs no amount
/// validation; that is the caller's job.
pub async fn recalc_total<C>(conn: &C, repair_id: Uuid) -> Result<Decimal, ServiceError>
where
    C: ConnectionTrait,
{
    let total: Decimal = charge::Entity::find()
        .filter(charge::Column::RepairId.eq(repair_id))
        .all(conn)
        .await?
        .iter()
        .map(|c| c.amount)
        .sum();

    repair::Entity::update_many()
        .col_expr(repair::Column::TotalCharges, Expr::value(total))
        .col_expr(repair::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(repair::Column::Id.eq(repair_id))
        .exec(conn)
        .await?;

    Ok(total)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddChargeRequest {
    /// One of INVENTORY, FLAT, DISCOUNT, OTHER
    pub kind: String,
    pub description: String,
    /// Signed amount; discounts are supplied negative. Must be non-zero.
    pub amount: Decimal,
    /// Staff member recording the charge
    pub actor_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct ChargeService {
    db: Arc<DatabaseConnection>,
    events: EventSender,
}

impl ChargeService {
    pub fn new(db: Arc<DatabaseConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Appends a manual charge to a repair's ledger and recomputes the total,
    /// all in one transaction.
    #[instrument(skip(self, request), fields(repair_id = %repair_id, amount = %request.amount))]
    pub async fn add_manual_charge(
        &self,
        repair_id: Uuid,
        request: AddChargeRequest,
    ) -> Result<charge::Model, ServiceError> {
        let kind = ChargeKind::from_str(&request.kind).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown charge kind: {}", request.kind))
        })?;
        if request.description.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Charge description must not be empty".to_string(),
            ));
        }
        if request.amount.is_zero() {
            return Err(ServiceError::ValidationError(
                "Charge amount must be non-zero".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let repair = repair::Entity::find_by_id(repair_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair {} not found", repair_id)))?;
        if repair.is_locked {
            return Err(ServiceError::BillLocked(repair_id));
        }

        let now = Utc::now();
        let inserted = charge::ActiveModel {
            id: Set(Uuid::new_v4()),
            repair_id: Set(repair_id),
            kind: Set(kind.to_string()),
            description: Set(request.description.trim().to_string()),
            amount: Set(request.amount),
            inventory_usage_id: Set(None),
            created_by: Set(request.actor_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        recalc_total(&txn, repair_id).await?;

        txn.commit().await?;

        if let Err(e) = self
            .events
            .send(Event::ChargeAdded {
                repair_id,
                charge_id: inserted.id,
                kind: inserted.kind.clone(),
                amount: inserted.amount,
            })
            .await
        {
            warn!(%repair_id, error = %e, "failed to emit charge audit event");
        }

        Ok(inserted)
    }

    /// All ledger entries for a repair, oldest first.
    #[instrument(skip(self), fields(repair_id = %repair_id))]
    pub async fn list_for_repair(
        &self,
        repair_id: Uuid,
    ) -> Result<Vec<charge::Model>, ServiceError> {
        let charges = charge::Entity::find()
            .filter(charge::Column::RepairId.eq(repair_id))
            .order_by_asc(charge::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(charges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_kind_wire_format() {
        assert_eq!(ChargeKind::Inventory.to_string(), "INVENTORY");
        assert_eq!(ChargeKind::Flat.to_string(), "FLAT");
        assert_eq!(ChargeKind::from_str("DISCOUNT").unwrap(), ChargeKind::Discount);
        assert!(ChargeKind::from_str("REFUND").is_err());
    }
}
