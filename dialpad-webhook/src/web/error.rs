//! Webhook failures and their HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::claims::ClaimsError;
use crate::token::DecodeError;

/// Fixed message returned for bodies that are not JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload.";

/// Every way a webhook request can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Invalid JSON payload.")]
    InvalidJson,

    #[error("request body has no `$content` field")]
    MissingToken,

    #[error("`$content` is not a string")]
    InvalidToken,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("decoded claims are not a JSON object")]
    InvalidClaims,

    #[error("event type not specified: {0}")]
    MissingState(ClaimsError),

    #[error("missing or invalid function key")]
    Unauthorized,
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidJson
            | WebhookError::MissingToken
            | WebhookError::InvalidToken
            | WebhookError::InvalidClaims
            | WebhookError::MissingState(_) => StatusCode::BAD_REQUEST,
            WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebhookError::Decode(e) if e.is_authentication_failure() => StatusCode::UNAUTHORIZED,
            WebhookError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WebhookError::InvalidJson => "invalid_json",
            WebhookError::MissingToken => "missing_token",
            WebhookError::InvalidToken => "invalid_token",
            WebhookError::InvalidClaims => "invalid_claims",
            WebhookError::MissingState(_) => "missing_state",
            WebhookError::Unauthorized => "unauthorized",
            WebhookError::Decode(e) if e.is_authentication_failure() => "unauthorized",
            WebhookError::Decode(_) => "decode_failed",
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(WebhookResponse {
                status: self.label(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
