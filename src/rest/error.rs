//! API error types and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wizard::WizardError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Validation error
    ValidationError(String),
    /// Request is well-formed but cannot be carried out for this user
    Unprocessable(String),
    /// Operation conflicts with the wizard's current step
    Conflict(String),
    /// The timesheet backend failed
    Upstream(String),
    /// Internal server error
    InternalError(String),
    /// Bad request
    BadRequest(String),
}

/// Error response body
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        let message = err.to_string();
        match err {
            e if e.is_validation() => ApiError::ValidationError(message),
            WizardError::InvalidTransition { .. } | WizardError::AlreadySubmitting => {
                ApiError::Conflict(message)
            }
            WizardError::LocationPermissionDenied
            | WizardError::CoordinatesUnavailable
            | WizardError::NoRolesAvailable => ApiError::Unprocessable(message),
            WizardError::NoPreviousTimesheet | WizardError::NoPreviousWork(_) => {
                ApiError::NotFound(message)
            }
            WizardError::Api(_) => ApiError::Upstream(message),
            _ => ApiError::InternalError(message),
        }
    }
}

impl From<crate::api::ApiError> for ApiError {
    fn from(err: crate::api::ApiError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
