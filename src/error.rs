// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;

/// A single failed field check, reported in the 400 response body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "This field is required")
    }
}

/// API error taxonomy with client-safe messages.
///
/// Duplicate resources answer 400 rather than 409 for compatibility with the
/// system this service replaces.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Gone(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        ApiError::Gone(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // 400, not 409: preserved from the system this replaces
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Internal errors never leak detail beyond a
    /// generic message; the original error is logged where it occurs.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(field_errors) => json!({ "errors": field_errors }),
            ApiError::Internal(_) => json!({ "error": "Internal server error" }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => ApiError::not_found(format!("Document not found: {}", key)),
            StoreError::AlreadyExists(key) => {
                ApiError::conflict(format!("Document already exists: {}", key))
            }
            StoreError::Backend(e) => {
                tracing::error!(error = %e, "store backend error");
                ApiError::internal(e.to_string())
            }
            StoreError::InvalidCollection(name) => {
                tracing::error!(collection = %name, "invalid collection name");
                ApiError::internal(format!("invalid collection: {}", name))
            }
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Invalid => ApiError::unauthorized("Invalid token"),
            crate::auth::TokenError::Generation(msg) => {
                tracing::error!(error = %msg, "token generation failed");
                ApiError::internal(msg)
            }
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::internal("Password hashing failed")
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!(error = %err, "JSON serialization error");
        ApiError::internal("Failed to format response")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_answers_400_not_409() {
        assert_eq!(ApiError::conflict("dup").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_body_uses_errors_array() {
        let err = ApiError::Validation(vec![FieldError::missing("filename")]);
        let body = err.to_json();
        assert!(body.get("errors").and_then(Value::as_array).is_some());
        assert_eq!(body["errors"][0]["field"], "filename");
    }

    #[test]
    fn internal_body_is_generic() {
        let err = ApiError::internal("connection refused to 10.0.0.5");
        assert_eq!(err.to_json()["error"], "Internal server error");
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::gone("x").status_code(), StatusCode::GONE);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
