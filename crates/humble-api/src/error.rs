//! Error types for the HTTP surface.
//!
//! [`ApiError`] unifies every failure into a single enum that converts
//! into an Axum response with a `{"error": <message>}` body.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use humble_roster::{RosterError, ValidationError};
use tracing::{debug, error};

/// Message for generic malformed input.
pub const INVALID_DATA: &str = "Invalid superhero data";
/// Message for a bad humility score.
pub const INVALID_HUMILITY: &str = "Humility score must be an integer between 1 and 10";
/// Message for a create (or rename) onto a taken name.
pub const ALREADY_EXISTS: &str = "Superhero already exists";
/// Message for an unknown hero name.
pub const NOT_FOUND: &str = "Superhero not found";
/// Message for anything unclassified.
pub const INTERNAL: &str = "Internal server error";

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The roster rejected the request.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Something unexpected went wrong.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Roster(RosterError::Validation(err))
    }
}

impl ApiError {
    /// Status code and user-facing message for this error.
    pub const fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Roster(RosterError::Validation(ValidationError::MalformedInput { .. })) => {
                (StatusCode::BAD_REQUEST, INVALID_DATA)
            }
            Self::Roster(RosterError::Validation(ValidationError::HumilityScoreOutOfRange)) => {
                (StatusCode::BAD_REQUEST, INVALID_HUMILITY)
            }
            Self::Roster(RosterError::DuplicateName { .. }) => {
                (StatusCode::BAD_REQUEST, ALREADY_EXISTS)
            }
            Self::Roster(RosterError::NotFound { .. }) => (StatusCode::NOT_FOUND, NOT_FOUND),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Render a caught handler panic as a 500 response.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "unknown panic".to_owned());
    ApiError::Internal(detail).into_response()
}
