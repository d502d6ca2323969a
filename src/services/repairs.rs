use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{charge, customer, device, repair},
    errors::ServiceError,
    events::{Event, EventSender},
    services::charges::{recalc_total, ChargeKind},
    services::status::RepairStatus,
};

/// Token prefix printed on the intake slip.
const TOKEN_PREFIX: &str = "RS";
/// Tokens key their date portion to shop-local time, fixed at UTC+05:00.
const TOKEN_OFFSET_SECS: i32 = 5 * 3600;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerInput {
    /// Existing customer to reuse; a new record is created when absent or
    /// unresolvable.
    pub id: Option<Uuid>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DeviceInput {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IntakeRequest {
    pub customer: CustomerInput,
    #[serde(default)]
    pub device: DeviceInput,
    pub intake_notes: Option<String>,
    /// Flat fee applied at intake; no charge is seeded when zero.
    #[serde(default)]
    pub flat_charge: Decimal,
    pub assigned_staff_id: Option<Uuid>,
    /// Staff member performing the intake
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntakeOutcome {
    pub repair: repair::Model,
    pub customer: customer::Model,
    pub device: device::Model,
}

#[derive(Clone)]
pub struct RepairService {
    db: Arc<DatabaseConnection>,
    events: EventSender,
}

impl RepairService {
    pub fn new(db: Arc<DatabaseConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Creates a repair from a walk-in: resolves or creates the customer,
    /// registers the device, issues the scannable token, and seeds the flat
    /// intake charge when one applies. One transaction end to end.
    #[instrument(skip(self, request), fields(customer_name = %request.customer.name))]
    pub async fn intake(&self, request: IntakeRequest) -> Result<IntakeOutcome, ServiceError> {
        if request.customer.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Customer name is required".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start intake transaction");
            ServiceError::DatabaseError(e)
        })?;

        let now = Utc::now();

        let customer = self.resolve_customer(&txn, &request.customer, now).await?;

        let device = device::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer.id),
            brand: Set(request.device.brand.clone()),
            model: Set(request.device.model.clone()),
            serial_number: Set(request.device.serial_number.clone()),
            description: Set(request.device.description.clone()),
            category: Set(request.device.category.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let token = next_token(&txn).await?;

        let repair = repair::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.clone()),
            customer_id: Set(customer.id),
            device_id: Set(device.id),
            assigned_staff_id: Set(request.assigned_staff_id),
            status: Set(RepairStatus::Intake.to_string()),
            intake_notes: Set(request.intake_notes.clone()),
            flat_charge: Set(request.flat_charge),
            total_charges: Set(Decimal::ZERO),
            staff_share_amount: Set(Decimal::ZERO),
            shop_share_amount: Set(Decimal::ZERO),
            is_locked: Set(false),
            intake_at: Set(now),
            to_repair_at: Set(None),
            in_repair_at: Set(None),
            completed_at: Set(None),
            delivered_at: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
            version: Set(1),
        }
        .insert(&txn)
        .await?;

        if request.flat_charge > Decimal::ZERO {
            charge::ActiveModel {
                id: Set(Uuid::new_v4()),
                repair_id: Set(repair.id),
                kind: Set(ChargeKind::Flat.to_string()),
                description: Set("Intake flat charge".to_string()),
                amount: Set(request.flat_charge),
                inventory_usage_id: Set(None),
                created_by: Set(request.actor_id),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        let total = recalc_total(&txn, repair.id).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "failed to commit intake transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(repair_id = %repair.id, %token, %total, "repair intake completed");

        if let Err(e) = self
            .events
            .send(Event::RepairCreated {
                repair_id: repair.id,
                customer_id: customer.id,
                device_id: device.id,
                token: token.clone(),
                flat_charge: request.flat_charge,
            })
            .await
        {
            warn!(repair_id = %repair.id, error = %e, "failed to emit intake audit event");
        }

        // Re-read so the returned repair carries the recomputed total.
        let repair = repair::Entity::find_by_id(repair.id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("repair {} vanished after intake", repair.id))
            })?;

        Ok(IntakeOutcome {
            repair,
            customer,
            device,
        })
    }

    async fn resolve_customer(
        &self,
        txn: &DatabaseTransaction,
        input: &CustomerInput,
        now: DateTime<Utc>,
    ) -> Result<customer::Model, ServiceError> {
        if let Some(id) = input.id {
            if let Some(existing) = customer::Entity::find_by_id(id).one(txn).await? {
                return Ok(existing);
            }
        }

        let created = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            phone: Set(input.phone.clone()),
            email: Set(input.email.clone()),
            address: Set(input.address.clone()),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(txn)
        .await?;
        Ok(created)
    }

    /// Moves a repair along the status graph, stamping the milestone for the
    /// status being entered. Milestones are never cleared, including on the
    /// `TO_REPAIR → INTAKE` correction edge.
    #[instrument(skip(self), fields(repair_id = %repair_id, requested = requested))]
    pub async fn update_status(
        &self,
        repair_id: Uuid,
        requested: &str,
    ) -> Result<repair::Model, ServiceError> {
        let requested = RepairStatus::parse(requested)?;

        let txn = self.db.begin().await?;

        let repair = repair::Entity::find_by_id(repair_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair {} not found", repair_id)))?;

        let current = RepairStatus::parse(&repair.status).map_err(|_| {
            ServiceError::InternalError(format!(
                "repair {} carries unknown status {}",
                repair_id, repair.status
            ))
        })?;

        // A settled bill may still be handed over, nothing else.
        if repair.is_locked && requested != RepairStatus::Delivered {
            return Err(ServiceError::BillLocked(repair_id));
        }

        if !current.can_transition(requested) {
            return Err(ServiceError::IllegalTransition {
                from: current.to_string(),
                to: requested.to_string(),
            });
        }

        let now = Utc::now();
        let mut active: repair::ActiveModel = repair.clone().into();
        active.status = Set(requested.to_string());
        match requested {
            RepairStatus::ToRepair => active.to_repair_at = Set(Some(now)),
            RepairStatus::InRepair => active.in_repair_at = Set(Some(now)),
            RepairStatus::Repaired | RepairStatus::Unrepairable => {
                active.completed_at = Set(Some(now))
            }
            RepairStatus::Delivered => active.delivered_at = Set(Some(now)),
            RepairStatus::Intake => {}
        }
        active.updated_at = Set(Some(now));
        active.version = Set(repair.version + 1);

        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(from = %current, to = %requested, "repair status updated");

        if let Err(e) = self
            .events
            .send(Event::RepairStatusChanged {
                repair_id,
                from: current.to_string(),
                to: requested.to_string(),
            })
            .await
        {
            warn!(%repair_id, error = %e, "failed to emit status audit event");
        }

        Ok(updated)
    }

    #[instrument(skip(self), fields(repair_id = %repair_id))]
    pub async fn get_repair(&self, repair_id: Uuid) -> Result<repair::Model, ServiceError> {
        repair::Entity::find_by_id(repair_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair {} not found", repair_id)))
    }

    /// Lookup by the human-scannable token on the intake slip.
    #[instrument(skip(self), fields(token = token))]
    pub async fn get_by_token(&self, token: &str) -> Result<repair::Model, ServiceError> {
        repair::Entity::find()
            .filter(repair::Column::Token.eq(token))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Repair with token {} not found", token)))
    }

    #[instrument(skip(self))]
    pub async fn list_repairs(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<repair::Model>, u64), ServiceError> {
        let paginator = repair::Entity::find()
            .order_by_desc(repair::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let repairs = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((repairs, total))
    }
}

fn token_offset() -> FixedOffset {
    FixedOffset::east_opt(TOKEN_OFFSET_SECS).expect("token offset is a valid fixed offset")
}

fn token_day_key(now: DateTime<Utc>) -> String {
    now.with_timezone(&token_offset()).format("%y%m%d").to_string()
}

fn format_token(day_key: &str, seq: i32) -> String {
    format!("{}{}{:04}", TOKEN_PREFIX, day_key, seq)
}

/// Issues the next token for today: bumps the per-day counter row with an
/// atomic increment-and-read, so tokens stay strictly increasing within a
/// day and collision-free across server instances.
async fn next_token(txn: &DatabaseTransaction) -> Result<String, ServiceError> {
    let day_key = token_day_key(Utc::now());
    let backend = txn.get_database_backend();

    let sql = match backend {
        DbBackend::Postgres => {
            "INSERT INTO token_counters (day_key, last_seq) VALUES ($1, 1) \
             ON CONFLICT (day_key) DO UPDATE SET last_seq = token_counters.last_seq + 1 \
             RETURNING last_seq"
        }
        _ => {
            "INSERT INTO token_counters (day_key, last_seq) VALUES (?, 1) \
             ON CONFLICT (day_key) DO UPDATE SET last_seq = token_counters.last_seq + 1 \
             RETURNING last_seq"
        }
    };

    let row = txn
        .query_one(Statement::from_sql_and_values(
            backend,
            sql,
            [day_key.clone().into()],
        ))
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError("token counter upsert returned no row".to_string())
        })?;
    let seq: i32 = row.try_get("", "last_seq")?;

    Ok(format_token(&day_key, seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn token_is_prefix_date_and_padded_sequence() {
        let token = format_token("260806", 7);
        assert_eq!(token, "RS2608060007");

        let pattern = regex::Regex::new(r"^RS\d{6}\d{4}$").unwrap();
        assert!(pattern.is_match(&token));
        assert!(pattern.is_match(&format_token("991231", 9999)));
    }

    #[test]
    fn sequence_pads_to_four_digits() {
        assert!(format_token("260806", 1).ends_with("0001"));
        assert!(format_token("260806", 123).ends_with("0123"));
        assert!(format_token("260806", 10000).ends_with("10000"));
    }

    #[test]
    fn day_key_uses_fixed_shop_offset() {
        // 20:30 UTC is already the next day at UTC+05:00.
        let late_evening = Utc.with_ymd_and_hms(2026, 8, 6, 20, 30, 0).unwrap();
        assert_eq!(token_day_key(late_evening), "260807");

        let morning = Utc.with_ymd_and_hms(2026, 8, 6, 8, 0, 0).unwrap();
        assert_eq!(token_day_key(morning), "260806");
    }

    #[test]
    fn tokens_within_a_day_are_strictly_increasing() {
        let a = format_token("260806", 12);
        let b = format_token("260806", 13);
        assert!(b > a);
    }
}
