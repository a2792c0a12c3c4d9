// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a JSON error body.
/// Upstream and backing-store failures carry the raw error text so the caller sees it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found with id: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Record store error: {0}")]
    RecordStoreError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::InvalidInput(_) => "INVALID_INPUT",
            StoreError::ValidationError(_) => "VALIDATION_ERROR",
            StoreError::DatabaseError(_) => "DATABASE_ERROR",
            StoreError::RecordStoreError(_) => "RECORD_STORE_ERROR",
            StoreError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            StoreError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Convert StoreError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for StoreError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::ValidationError(_) => StatusCode::BAD_REQUEST,
            StoreError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::RecordStoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::ExternalApiError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StoreError::InvalidInput("ID is missing".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::ValidationError("name is missing".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::RecordStoreError("quota".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StoreError::ExternalApiError("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_is_bare() {
        // Missing-field messages surface verbatim in the response body
        let err = StoreError::ValidationError("name is missing".into());
        assert_eq!(err.to_string(), "name is missing");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_upstream_error_keeps_raw_text() {
        let err = StoreError::ExternalApiError("API error 401: invalid key".into());
        assert!(err.to_string().contains("invalid key"));
    }
}
