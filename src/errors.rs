use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Unprocessable Entity",
    "message": "Overpayment: payment of 700 exceeds outstanding balance 650 for repair 550e8400-e29b-41d4-a716-446655440000",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Service-layer error taxonomy.
///
/// Business-rule failures carry the ids and amounts the HTTP layer needs to
/// render a corrective message; storage failures stay opaque so a UI can fall
/// back to a generic "try again".
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Bill for repair {0} is locked")]
    BillLocked(Uuid),

    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: Uuid,
        requested: i32,
        available: i32,
    },

    #[error("Stock for item {0} went negative; operation rolled back")]
    StockWentNegative(Uuid),

    #[error("Overpayment: payment of {attempted} exceeds outstanding balance {outstanding} for repair {repair_id}")]
    Overpayment {
        repair_id: Uuid,
        attempted: Decimal,
        outstanding: Decimal,
    },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::IllegalTransition { .. } | Self::BillLocked(_) | Self::StockWentNegative(_) => {
                StatusCode::CONFLICT
            }
            Self::InsufficientStock { .. } | Self::Overpayment { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::DatabaseError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) | Self::Other(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// True for failures the caller can fix by correcting input or retrying
    /// a different action; false for infrastructure faults.
    pub fn is_business_rule(&self) -> bool {
        !matches!(
            self,
            Self::DatabaseError(_) | Self::InternalError(_) | Self::Other(_)
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rust_decimal_macros::dec;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidStatus("BROKEN".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::IllegalTransition {
                from: "DELIVERED".into(),
                to: "INTAKE".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::BillLocked(Uuid::new_v4()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InsufficientStock {
                item_id: Uuid::new_v4(),
                requested: 5,
                available: 2
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::Overpayment {
                repair_id: Uuid::new_v4(),
                attempted: dec!(700),
                outstanding: dec!(650)
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::InternalError("connection string leaked".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::DatabaseError(sea_orm::DbErr::Custom("pool exhausted".into()))
                .response_message(),
            "Database error"
        );

        // Business-rule errors keep their context.
        let msg = ServiceError::InsufficientStock {
            item_id: Uuid::nil(),
            requested: 5,
            available: 2,
        }
        .response_message();
        assert!(msg.contains("requested 5"));
        assert!(msg.contains("available 2"));
    }

    #[test]
    fn business_rule_classification() {
        assert!(ServiceError::BillLocked(Uuid::nil()).is_business_rule());
        assert!(ServiceError::StockWentNegative(Uuid::nil()).is_business_rule());
        assert!(!ServiceError::InternalError("x".into()).is_business_rule());
        assert!(
            !ServiceError::DatabaseError(sea_orm::DbErr::Custom("x".into())).is_business_rule()
        );
    }

    #[tokio::test]
    async fn into_response_sets_status_and_body() {
        let response = ServiceError::NotFound("repair missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.error, "Not Found");
        assert!(payload.message.contains("repair missing"));
    }
}
