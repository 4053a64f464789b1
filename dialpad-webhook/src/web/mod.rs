//! Web server module for the Dialpad webhook.
//!
//! Routes:
//! - `GET /health`: liveness probe
//! - `POST /dialpad`: decode and dispatch a Dialpad event

pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::{WebhookError, WebhookResponse, INVALID_JSON_MESSAGE};
pub use handlers::{
    dialpad_webhook, handle_webhook, health, AppState, HealthResponse, WebhookQuery,
    FUNCTION_KEY_HEADER, TOKEN_FIELD,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dialpad", post(dialpad_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
