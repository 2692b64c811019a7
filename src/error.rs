use crate::schemas::ErrorResponse;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use model::store::StoreError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Errors a handler can surface to the client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Lookup by id found nothing; the message is returned verbatim
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or foreign-key constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The request body or path could not be turned into a valid request
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Anything else; details are logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ConstraintViolation(_) => StatusCode::CONFLICT,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::NotFound(message) => message,
            ApiError::ConstraintViolation(detail) => {
                warn!("Rejected write: {}", detail);
                format!("Constraint violation: {}", detail)
            }
            ApiError::MalformedRequest(detail) => {
                warn!("Rejected request: {}", detail);
                format!("Malformed request: {}", detail)
            }
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ConstraintViolation(detail) => ApiError::ConstraintViolation(detail),
            StoreError::Database(db_error) => ApiError::Internal(db_error.to_string()),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(error: DbErr) -> Self {
        StoreError::from(error).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ApiError::MalformedRequest(format!("invalid or empty field(s): {}", fields.join(", ")))
    }
}

/// Result type alias for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("User").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ConstraintViolation("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::MalformedRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::not_found("Book").to_string(), "Book not found");
    }

    #[test]
    fn test_store_errors_map_to_api_errors() {
        let constraint: ApiError = StoreError::ConstraintViolation("UNIQUE".into()).into();
        assert!(matches!(constraint, ApiError::ConstraintViolation(_)));

        let other: ApiError = StoreError::Database(DbErr::Custom("boom".into())).into();
        assert!(matches!(other, ApiError::Internal(_)));
    }
}
