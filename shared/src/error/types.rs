//! Error type and HTTP error body

use super::codes::ErrorCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The primary error type across the backend:
/// - standardized codes via [`ErrorCode`]
/// - human-readable message in the application's operating language
/// - optional structured details (field-level errors, shortfalls, context)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

/// Result type for fallible application operations
pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response:
/// `{ "error": "<label>", "message": "<text>", "details": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> http::StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} no encontrado", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create a business rule violation
    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BusinessRule, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Unified message for bad credentials, preventing email enumeration
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal detail never leaves the process: log it, return the
        // sanitized default message for 5xx codes.
        let status = self.http_status();
        let message = if status.is_server_error() {
            tracing::error!(code = %self.code, error = %self.message, "Internal error occurred");
            self.code.message().to_string()
        } else {
            self.message
        };

        let body = ErrorBody {
            error: self.code.label().to_string(),
            message,
            details: if status.is_server_error() {
                None
            } else {
                self.details
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let err = AppError::new(ErrorCode::InsufficientStock)
            .with_detail("producto", "producto:abc")
            .with_detail("faltante", 3);

        let body = ErrorBody {
            error: err.code.label().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "INSUFFICIENT_STOCK");
        assert_eq!(json["message"], "Stock insuficiente");
        assert_eq!(json["details"]["faltante"], 3);
    }

    #[test]
    fn test_details_omitted_when_none() {
        let body = ErrorBody {
            error: "NOT_FOUND".into(),
            message: "Recurso no encontrado".into(),
            details: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_default_message_from_code() {
        let err = AppError::new(ErrorCode::ClientPhoneExists);
        assert_eq!(err.message, "Ya existe un cliente activo con ese teléfono");
    }
}
