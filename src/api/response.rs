//! Response types for the HRMS API.
//!
//! This module defines the error response structures and the mapping from
//! [`HrmsError`] to HTTP status codes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::HrmsError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<HrmsError> for ApiErrorResponse {
    fn from(error: HrmsError) -> Self {
        let message = error.to_string();
        match error {
            HrmsError::ConfigNotFound { path } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            HrmsError::ConfigParseError { path, message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            HrmsError::Database { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("DATABASE_ERROR", "Database error", message),
            ),
            HrmsError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            HrmsError::Validation { field, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            HrmsError::InsufficientBalance { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INSUFFICIENT_BALANCE", message),
            ),
            HrmsError::BalanceNotFound { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("BALANCE_NOT_FOUND", message),
            ),
            HrmsError::LeaveOverlap { .. } => {
                Self::new(StatusCode::CONFLICT, ApiError::new("LEAVE_OVERLAP", message))
            }
            HrmsError::InvalidTransition { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("INVALID_TRANSITION", message),
            ),
            HrmsError::Forbidden { .. } => {
                Self::new(StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            HrmsError::Duplicate { .. } => {
                Self::new(StatusCode::CONFLICT, ApiError::new("DUPLICATE", message))
            }
            HrmsError::CalculationError { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                // serde's message names the offending field
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error(rejection.body_text()),
        )
    }
}
