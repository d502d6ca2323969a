use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::payments::{PaymentOutcome, RecordPaymentRequest};
use crate::AppState;

/// Record a payment against a repair's bill
#[utoipa::path(
    post,
    path = "/api/v1/repairs/{id}/payments",
    request_body = RecordPaymentRequest,
    params(("id" = Uuid, Path, description = "Repair id")),
    responses(
        (status = 201, description = "Payment recorded", body = PaymentOutcome),
        (status = 400, description = "Invalid amount or method", body = crate::errors::ErrorResponse),
        (status = 404, description = "Repair not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Payment would exceed the outstanding balance", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.payments.record_payment(id, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let payments = state.services.payments.list_for_repair(id).await?;
    Ok(Json(payments))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/:id/payments", post(record_payment).get(list_payments))
}
