//! Error responses shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::foundation::DomainError;
use crate::domain::reservation::ReservationError;

/// JSON error body: `{ code, message, details? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal() -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "Something went wrong. Please try again.".to_string(),
            details: None,
        }
    }
}

/// Maps a handler error onto its status code and JSON body.
pub fn error_response(error: impl Into<ReservationError>) -> Response {
    let error = error.into();
    let status = match &error {
        ReservationError::Validation(_) => StatusCode::BAD_REQUEST,
        ReservationError::Conflict(_) => StatusCode::CONFLICT,
        ReservationError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        ReservationError::NotFound { .. } => StatusCode::NOT_FOUND,
        ReservationError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ReservationError::Infrastructure(message) => {
            tracing::error!(error = %message, "request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal()))
                .into_response();
        }
    };

    let details = match &error {
        ReservationError::Validation(rejection) | ReservationError::Conflict(rejection) => {
            let mut details = json!({ "reason": rejection.reason() });
            if let Some(remaining) = rejection.remaining_seats() {
                details["remaining_seats"] = json!(remaining);
            }
            Some(details)
        }
        ReservationError::PermissionDenied { required, .. } => {
            Some(json!({ "required_role": required.to_string() }))
        }
        _ => None,
    };

    let body = ErrorResponse {
        code: error.code().to_string(),
        message: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

/// Shorthand for read paths that only fail on storage.
pub fn storage_error(error: DomainError) -> Response {
    error_response(error)
}
