//! Token decoding for Dialpad webhook payloads.
//!
//! Dialpad delivers each event as a Base64-wrapped JWT. This module
//! unwraps it, reads the claim set and, when enabled, checks the HS256
//! signature against the shared webhook secret.
//!
//! ## Decoding Flow
//!
//! ```text
//! $content → Base64 → header.payload.signature → (HS256 check) → Claims
//! ```

pub mod decoder;

pub use decoder::{decode, DecodeError};
