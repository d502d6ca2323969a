use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{entities::staff, errors::ServiceError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 200, message = "Staff name is required"))]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
    /// Fraction of a fully-paid bill allocated to this staff member when
    /// they receive the settling payment. Must lie in [0, 1].
    #[serde(default)]
    pub commission_rate: Decimal,
}

fn default_role() -> String {
    "technician".to_string()
}

#[derive(Clone)]
pub struct StaffService {
    db: Arc<DatabaseConnection>,
}

impl StaffService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateStaffRequest) -> Result<staff::Model, ServiceError> {
        request.validate()?;
        if request.commission_rate < Decimal::ZERO || request.commission_rate > Decimal::ONE {
            return Err(ServiceError::ValidationError(
                "Commission rate must lie between 0 and 1".to_string(),
            ));
        }

        let created = staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            role: Set(request.role),
            commission_rate: Set(request.commission_rate),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(staff_id = %created.id, "staff member created");
        Ok(created)
    }

    #[instrument(skip(self), fields(staff_id = %staff_id))]
    pub async fn get(&self, staff_id: Uuid) -> Result<staff::Model, ServiceError> {
        staff::Entity::find_by_id(staff_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff {} not found", staff_id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<staff::Model>, u64), ServiceError> {
        let paginator = staff::Entity::find()
            .order_by_asc(staff::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let members = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((members, total))
    }
}
