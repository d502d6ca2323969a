use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::common::{PaginatedResponse, PaginationParams};
use crate::services::repairs::{IntakeOutcome, IntakeRequest};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionRequest {
    /// Requested status, one of INTAKE, TO_REPAIR, IN_REPAIR, REPAIRED,
    /// UNREPAIRABLE, DELIVERED
    pub status: String,
}

/// Create a repair intake
#[utoipa::path(
    post,
    path = "/api/v1/repairs",
    request_body = IntakeRequest,
    responses(
        (status = 201, description = "Repair created", body = IntakeOutcome),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    tag = "Repairs"
)]
pub async fn create_intake(
    State(state): State<AppState>,
    Json(payload): Json<IntakeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.repairs.intake(payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Transition a repair along the status graph
#[utoipa::path(
    post,
    path = "/api/v1/repairs/{id}/status",
    request_body = TransitionRequest,
    params(("id" = Uuid, Path, description = "Repair id")),
    responses(
        (status = 200, description = "Status updated", body = crate::entities::repair::Model),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Repair not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Illegal transition or locked bill", body = crate::errors::ErrorResponse)
    ),
    tag = "Repairs"
)]
pub async fn transition_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let repair = state
        .services
        .repairs
        .update_status(id, &payload.status)
        .await?;
    Ok(Json(repair))
}

async fn get_repair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let repair = state.services.repairs.get_repair(id).await?;
    Ok(Json(repair))
}

async fn get_repair_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let repair = state.services.repairs.get_by_token(&token).await?;
    Ok(Json(repair))
}

async fn list_repairs(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (repairs, total) = state
        .services
        .repairs
        .list_repairs(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        repairs,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_intake).get(list_repairs))
        .route("/:id", get(get_repair))
        .route("/token/:token", get(get_repair_by_token))
        .route("/:id/status", post(transition_status))
        .merge(super::charges::routes())
        .merge(super::payments::routes())
        .merge(super::inventory::usage_routes())
}
