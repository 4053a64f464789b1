//! Webhook endpoint handlers.
//!
//! The Dialpad endpoint runs the whole request inline:
//! 1. Check the function key (if configured)
//! 2. Parse the JSON body and pull out `$content`
//! 3. Decode the token and dispatch on its `state`
//! 4. Echo the decoded claims back

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use crate::claims::Claims;
use crate::events::dispatch;
use crate::token::decode;
use crate::web::error::WebhookError;
use crate::Config;

/// Body field carrying the Base64-wrapped token.
pub const TOKEN_FIELD: &str = "$content";

/// Header carrying the function key.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Dialpad Webhook
// =============================================================================

/// Query string accepted by the webhook route.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    /// Function key passed as `?code=`
    pub code: Option<String>,
}

/// Dialpad webhook endpoint.
///
/// A query string that does not deserialize (a repeated `code`, say) is
/// treated as carrying no function key rather than rejected outright.
pub async fn dialpad_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Option<Query<WebhookQuery>>,
    body: Bytes,
) -> Response {
    info!(body_length = body.len(), "dialpad_webhook_received");

    let code = query.and_then(|Query(query)| query.code);

    if let Err(e) = authorize(&state.config, &headers, code.as_deref()) {
        return e.into_response();
    }

    match handle_webhook(&state.config, &body) {
        Ok(claims) => {
            info!("dialpad_webhook_handled");
            (StatusCode::OK, Json(claims)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Check the caller's function key against the configured one.
fn authorize(
    config: &Config,
    headers: &HeaderMap,
    code: Option<&str>,
) -> Result<(), WebhookError> {
    let expected = match config.function_key.as_deref() {
        Some(key) => key,
        // No key configured, allow through
        None => return Ok(()),
    };

    let provided = headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(code);

    match provided {
        Some(provided) if keys_match(provided, expected) => Ok(()),
        Some(_) => {
            warn!("dialpad_function_key_invalid");
            Err(WebhookError::Unauthorized)
        }
        None => {
            warn!("dialpad_function_key_missing");
            Err(WebhookError::Unauthorized)
        }
    }
}

/// Constant-time key comparison.
fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Process one webhook body into its decoded claims.
///
/// Runs parse, token extraction, decode, validation and dispatch in order;
/// the first failure ends the request.
pub fn handle_webhook(config: &Config, body: &[u8]) -> Result<Claims, WebhookError> {
    let envelope: Value = serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "dialpad_payload_invalid_json");
        WebhookError::InvalidJson
    })?;

    let token = match envelope.get(TOKEN_FIELD) {
        Some(Value::String(token)) => token,
        Some(_) => {
            warn!(field = TOKEN_FIELD, "dialpad_token_not_a_string");
            return Err(WebhookError::InvalidToken);
        }
        None => {
            warn!(field = TOKEN_FIELD, "dialpad_token_missing");
            return Err(WebhookError::MissingToken);
        }
    };

    let claims = decode(token, config.secret(), config.verify_signature).map_err(|e| {
        if e.is_authentication_failure() {
            warn!(error = %e, "dialpad_token_rejected");
        } else {
            error!(error = %e, "dialpad_token_decode_failed");
        }
        WebhookError::Decode(e)
    })?;

    if claims.as_object().is_err() {
        warn!("dialpad_claims_not_an_object");
        return Err(WebhookError::InvalidClaims);
    }

    let dispatched = dispatch(&claims).map_err(|e| {
        warn!(error = %e, "dialpad_event_type_missing");
        WebhookError::MissingState(e)
    })?;

    info!(
        event_type = dispatched.kind.label(),
        extracted = dispatched.event.is_some(),
        "dialpad_event_dispatched"
    );

    Ok(claims)
}
