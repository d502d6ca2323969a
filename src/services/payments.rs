use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{payment, repair, staff},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    /// One of CASH, CARD, BANK_TRANSFER, OTHER
    pub method: String,
    /// Staff member receiving the money. Their commission rate is used for
    /// the share split if this payment settles the bill in full.
    pub actor_id: Uuid,
}

/// Outcome of a recorded payment: the payment row and the repair as it
/// stands after any lock/share update.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOutcome {
    pub payment: payment::Model,
    pub repair: repair::Model,
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    events: EventSender,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Records a payment against a repair's bill.
    ///
    /// If the payment settles the bill in full (equality allowed), the bill
    /// locks and the total is split into staff and shop shares using the
    /// receiving actor's commission rate. Concurrent payments on the same
    /// repair are serialized by an exclusive row lock so the overpayment
    /// check always sees a consistent paid sum.
    #[instrument(
        skip(self, request),
        fields(repair_id = %repair_id, amount = %request.amount, method = %request.method)
    )]
    pub async fn record_payment(
        &self,
        repair_id: Uuid,
        request: RecordPaymentRequest,
    ) -> Result<PaymentOutcome, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }
        let method = PaymentMethod::from_str(&request.method).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown payment method: {}", request.method))
        })?;

        let txn = self.db.begin().await?;

        let repair = repair::Entity::find_by_id(repair_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair {} not found", repair_id)))?;

        let paid_so_far: Decimal = payment::Entity::find()
            .filter(payment::Column::RepairId.eq(repair_id))
            .all(&txn)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();

        if paid_so_far + request.amount > repair.total_charges {
            return Err(ServiceError::Overpayment {
                repair_id,
                attempted: request.amount,
                outstanding: repair.total_charges - paid_so_far,
            });
        }

        let now = Utc::now();
        let inserted = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            repair_id: Set(repair_id),
            amount: Set(request.amount),
            method: Set(method.to_string()),
            received_by: Set(Some(request.actor_id)),
            received_at: Set(now),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let new_paid = paid_so_far + request.amount;
        let should_lock = new_paid >= repair.total_charges;

        let repair = if should_lock {
            // The split uses the receiver's commission rate, not the
            // assigned technician's.
            let receiver = staff::Entity::find_by_id(request.actor_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Staff {} not found", request.actor_id))
                })?;

            let staff_share = (repair.total_charges * receiver.commission_rate).round_dp(2);
            let shop_share = repair.total_charges - staff_share;

            let mut active: repair::ActiveModel = repair.clone().into();
            active.staff_share_amount = Set(staff_share);
            active.shop_share_amount = Set(shop_share);
            active.is_locked = Set(true);
            active.updated_at = Set(Some(now));
            active.version = Set(repair.version + 1);
            active.update(&txn).await?
        } else {
            repair
        };

        txn.commit().await?;

        info!(
            payment_id = %inserted.id,
            new_paid = %new_paid,
            locked = should_lock,
            "payment recorded"
        );

        if let Err(e) = self
            .events
            .send(Event::PaymentRecorded {
                repair_id,
                payment_id: inserted.id,
                amount: inserted.amount,
                method: inserted.method.clone(),
                paid_total: new_paid,
                total_charges: repair.total_charges,
                locked: should_lock,
            })
            .await
        {
            warn!(%repair_id, error = %e, "failed to emit payment audit event");
        }

        Ok(PaymentOutcome {
            payment: inserted,
            repair,
        })
    }

    /// All payments recorded against a repair, oldest first.
    #[instrument(skip(self), fields(repair_id = %repair_id))]
    pub async fn list_for_repair(
        &self,
        repair_id: Uuid,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        let payments = payment::Entity::find()
            .filter(payment::Column::RepairId.eq(repair_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payment_method_wire_format() {
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "BANK_TRANSFER");
        assert_eq!(
            PaymentMethod::from_str("CASH").unwrap(),
            PaymentMethod::Cash
        );
        assert!(PaymentMethod::from_str("CRYPTO").is_err());
        assert!(PaymentMethod::from_str("cash").is_err());
    }

    #[test]
    fn share_split_on_example_bill() {
        let total = dec!(650);
        let rate = dec!(0.2);
        let staff_share = (total * rate).round_dp(2);
        let shop_share = total - staff_share;
        assert_eq!(staff_share, dec!(130.00));
        assert_eq!(shop_share, dec!(520.00));
    }

    proptest! {
        /// The two shares always reassemble the exact total, whatever
        /// rounding the staff share went through.
        #[test]
        fn shares_sum_to_total(cents in 0i64..10_000_000, rate_bp in 0u32..=10_000) {
            let total = Decimal::new(cents, 2);
            let rate = Decimal::new(rate_bp as i64, 4);
            let staff_share = (total * rate).round_dp(2);
            let shop_share = total - staff_share;
            prop_assert_eq!(staff_share + shop_share, total);
            prop_assert!(staff_share >= Decimal::ZERO);
            prop_assert!(staff_share <= total);
        }
    }
}
