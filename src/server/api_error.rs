use super::validation::ValidationErrors;
use crate::inventory::InventoryError;
use crate::user::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error responses shared by the API handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized(&'static str),
    NotFound(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "validation error", "error": errors }),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "message": message })),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "message": message }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Internal server error" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(_) | InventoryError::ProductMissingForBatch(_) => {
                ApiError::NotFound("product not found".to_string())
            }
            InventoryError::DuplicateSku(_) => {
                ApiError::BadRequest("product with this sku already exists".to_string())
            }
            err @ (InventoryError::StockOverflow(_) | InventoryError::Storage(_)) => {
                error!("Inventory store failure: {}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUser(_) | AuthError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            AuthError::InvalidToken(_) => ApiError::Unauthorized("invalid token"),
            AuthError::Internal(e) => {
                error!("Auth failure: {:#}", e);
                ApiError::Internal
            }
        }
    }
}
