// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::VerificationError;
use crate::database::DatabaseError;
use crate::filter::FilterError;

/// Terminal failure for a single request. Every variant maps to a fixed status
/// and a client-safe message; internal detail is logged, never returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 405
    MethodNotAllowed,

    // 401 - no bearer credential presented
    Unauthenticated,

    // 401 - credential presented but rejected
    InvalidCredential,

    // 403
    Forbidden,

    // 400
    BadRequest(String),

    // 404
    NotFound(String),

    // 500 - query or connection failure
    StorageUnavailable,

    // 500 - anything else that is our fault
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Unauthenticated => "Authentication required",
            ApiError::InvalidCredential => "Invalid or expired token",
            ApiError::Forbidden => "Access denied",
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::StorageUnavailable => "Database error",
            ApiError::Internal => "Internal server error",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // Log the real error but return generic message
        tracing::error!("Database error: {}", err);
        ApiError::StorageUnavailable
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::MissingSecret | VerificationError::Signing(_) => {
                tracing::error!("Token verifier misconfigured: {}", err);
                ApiError::Internal
            }
            other => {
                tracing::debug!("Rejected bearer token: {}", other);
                ApiError::InvalidCredential
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::MissingParameter(_) | FilterError::InvalidValue { .. } => {
                ApiError::bad_request(err.to_string())
            }
            FilterError::InvalidIdentifier(_) | FilterError::MissingScope(_) => {
                tracing::error!("Query descriptor error: {}", err);
                ApiError::Internal
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
