//! # REST Error Mapping
//!
//! Turns [`ApplicationError`] into HTTP responses with the body
//! `{"error": "<message>", "kind": "<KIND>"}`.

use crate::application::error::{ApplicationError, ErrorKind};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message.
    pub error: String,
    /// Error category.
    pub kind: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a validation error from a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status for the category.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

/// HTTP status for an error category.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidTransition
        | ErrorKind::InsufficientCapacity
        | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let kind = err.kind();
        let message = if kind == ErrorKind::Unexpected {
            tracing::error!(error = %err, "request failed with internal error");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self { kind, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(kind = %self.kind, message = %self.message, "request rejected");
        }
        let body = ErrorResponse {
            error: self.message,
            kind: self.kind.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parses a path segment into an ID, failing with a validation error.
///
/// # Errors
///
/// Returns a validation [`ApiError`] if the segment is not a valid ID.
pub fn parse_id<T: std::str::FromStr>(resource: &str, raw: &str) -> ApiResult<T> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("invalid {resource} id: {raw}")))
}
