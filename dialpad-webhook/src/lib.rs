//! Dialpad webhook receiver.
//!
//! Dialpad posts call and message events as a JSON envelope whose
//! `$content` field holds a Base64-wrapped JWT. This crate decodes that
//! token, routes on its `state` claim and answers with the claim set.
//!
//! ## Architecture
//!
//! ```text
//! POST /dialpad → web → token::decode → Claims → events::dispatch → 200
//! ```

pub mod claims;
pub mod config;
pub mod events;
pub mod token;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use claims::{Claims, ClaimsError};
pub use config::{Config, ConfigError};
pub use events::{dispatch, Dispatched, Event, EventKind};
pub use token::{decode, DecodeError};
pub use web::{handle_webhook, router, AppState, WebhookError};
