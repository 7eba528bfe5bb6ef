/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; `ApiError` turns into the failure
/// envelope `{ "message": ..., "error": ... }` with a matching status.
///
/// Two tiers exist: client errors (400/404) carry a message only, and
/// internal errors (500) also expose the underlying error text in `error`.
///
/// # Example
///
/// ```
/// use inventory_api::error::{ApiError, ApiResult};
///
/// fn require_email(email: Option<&str>) -> ApiResult<&str> {
///     email.ok_or_else(|| ApiError::BadRequest("Email is required.".to_string()))
/// }
///
/// assert!(require_email(None).is_err());
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inventory_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Field validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Unexpected store or server failure (500)
    InternalError {
        /// Client-facing summary
        message: String,

        /// Underlying error text
        error: String,
    },
}

impl ApiError {
    /// Internal error with a custom summary message
    pub fn internal(message: impl Into<String>, error: impl fmt::Display) -> Self {
        ApiError::InternalError {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Underlying error, for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError { message, error } => {
                write!(f, "Internal error: {}: {}", message, error)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => ErrorResponse {
                message,
                error: None,
                details: None,
            },
            ApiError::ValidationError(details) => ErrorResponse {
                message: "Request validation failed".to_string(),
                error: None,
                details: Some(details),
            },
            ApiError::InternalError { message, error } => {
                tracing::error!(%error, "{}", message);
                ErrorResponse {
                    message,
                    error: Some(error),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Store failures are internal errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal("Server error", err)
    }
}

/// Convert validator errors into per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Email is required.".to_string());
        assert_eq!(err.to_string(), "Bad request: Email is required.");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");

        let err = ApiError::internal("Failed to place order", "connection reset");
        assert_eq!(
            err.to_string(),
            "Internal error: Failed to place order: connection reset"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound(String::new()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::internal("Server error", "boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_is_internal() {
        let err: ApiError = StoreError::Unavailable("lock poisoned".to_string()).into();
        match err {
            ApiError::InternalError { message, error } => {
                assert_eq!(message, "Server error");
                assert_eq!(error, "store unavailable: lock poisoned");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, message = "quantity must be at least 1"))]
        quantity: i64,
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let err: ApiError = Sample { quantity: 0 }.validate().unwrap_err().into();
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(
                    details,
                    vec![ValidationErrorDetail {
                        field: "quantity".to_string(),
                        message: "quantity must be at least 1".to_string(),
                    }]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
