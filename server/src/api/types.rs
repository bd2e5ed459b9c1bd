//! Shared API types
//!
//! Error responses common to all endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::data::search::{SearchError, Violations};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    /// Request constraints not satisfied; lists every violation
    Invalid(Violations),
    NotFound { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        tracing::error!(error = %e, backend = e.backend(), transient = e.is_transient(), "Data error");
        Self::internal("Database operation failed")
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Invalid(violations) => Self::Invalid(violations),
            SearchError::Persistence(e) => Self::from_data(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::Invalid(violations) => return validation_response(&violations),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// 400 body carrying the full violation list
pub(crate) fn validation_response(violations: &Violations) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "bad_request",
            "code": "VALIDATION_ERROR",
            "message": violations.summary(),
            "violations": violations,
        })),
    )
        .into_response()
}
