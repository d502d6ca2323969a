use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::charges::AddChargeRequest;
use crate::AppState;

/// Add a manual charge to a repair's ledger
#[utoipa::path(
    post,
    path = "/api/v1/repairs/{id}/charges",
    request_body = AddChargeRequest,
    params(("id" = Uuid, Path, description = "Repair id")),
    responses(
        (status = 201, description = "Charge added", body = crate::entities::charge::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Repair not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Bill is locked", body = crate::errors::ErrorResponse)
    ),
    tag = "Charges"
)]
pub async fn add_charge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddChargeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let charge = state.services.charges.add_manual_charge(id, payload).await?;
    Ok((StatusCode::CREATED, Json(charge)))
}

async fn list_charges(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let charges = state.services.charges.list_for_repair(id).await?;
    Ok(Json(charges))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/:id/charges", post(add_charge).get(list_charges))
}
