use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::common::{validate_input, PaginatedResponse, PaginationParams};
use crate::services::staff::CreateStaffRequest;
use crate::AppState;

async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let member = state.services.staff.create(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let member = state.services.staff.get(id).await?;
    Ok(Json(member))
}

async fn list_staff(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (members, total) = state
        .services
        .staff
        .list(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        members,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff).get(list_staff))
        .route("/:id", get(get_staff))
}
