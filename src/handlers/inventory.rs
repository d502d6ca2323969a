use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::common::{validate_input, PaginatedResponse, PaginationParams};
use crate::services::inventory::{
    CreateInventoryItemRequest, InventoryUsageOutcome, UseInventoryRequest,
};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestockRequest {
    pub quantity: i32,
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let item = state.services.inventory.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(Json(item))
}

async fn list_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list_items(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        items,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

async fn restock_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RestockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .inventory
        .restock(id, payload.quantity)
        .await?;
    Ok(Json(item))
}

async fn deactivate_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.inventory.deactivate(id).await?;
    Ok(Json(item))
}

/// Consume stock for a repair
#[utoipa::path(
    post,
    path = "/api/v1/repairs/{id}/inventory-usages",
    request_body = UseInventoryRequest,
    params(("id" = Uuid, Path, description = "Repair id")),
    responses(
        (status = 201, description = "Stock consumed and charged", body = InventoryUsageOutcome),
        (status = 404, description = "Repair or item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Bill is locked or stock race detected", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Inventory"
)]
pub async fn consume_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UseInventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.inventory.use_inventory(id, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Stock-keeping routes mounted under `/api/v1/inventory`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/:id", get(get_item))
        .route("/:id/restock", post(restock_item))
        .route("/:id/deactivate", post(deactivate_item))
}

/// Consumption route mounted under `/api/v1/repairs`.
pub fn usage_routes() -> Router<AppState> {
    Router::new().route("/:id/inventory-usages", post(consume_inventory))
}
