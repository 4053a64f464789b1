//! Base64-wrapped JWT decoding.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode_header, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::claims::Claims;

/// Errors raised while turning `$content` into a claim set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("token is not valid UTF-8")]
    InvalidUtf8,

    #[error("token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("token {segment} segment is malformed: {reason}")]
    InvalidSegment {
        segment: &'static str,
        reason: String,
    },

    #[error("signature verification requires a webhook secret")]
    MissingSecret,

    #[error("unsupported signing algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("token signature does not match")]
    InvalidSignature,
}

impl DecodeError {
    /// Whether the token was well formed but not trusted.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidSignature | DecodeError::UnsupportedAlgorithm(_)
        )
    }
}

/// Decode a Base64-wrapped JWT into its claim set.
///
/// With `verify_signature` off the header and signature segments are
/// ignored entirely, so anyone able to reach the endpoint can forge
/// events. That mode exists because some Dialpad webhooks are created
/// without a secret.
pub fn decode(
    encoded_token: &str,
    secret: &str,
    verify_signature: bool,
) -> Result<Claims, DecodeError> {
    let raw = STANDARD
        .decode(encoded_token.trim())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    let compact = String::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)?;

    let segments: Vec<&str> = compact.split('.').collect();
    if segments.len() != 3 {
        warn!(segments = segments.len(), "token_segment_count_invalid");
        return Err(DecodeError::SegmentCount(segments.len()));
    }

    let claims = if verify_signature {
        decode_verified(&compact, secret)?
    } else {
        warn!("signature_verification_disabled");
        parse_segment("payload", segments[1])?
    };

    debug!(verified = verify_signature, "token_decoded");

    Ok(Claims::new(claims))
}

/// Check an HS256 token against `secret` and return its claims.
fn decode_verified(compact: &str, secret: &str) -> Result<Value, DecodeError> {
    if secret.is_empty() {
        return Err(DecodeError::MissingSecret);
    }

    let header = decode_header(compact).map_err(|e| jwt_error("header", &e))?;
    if header.alg != Algorithm::HS256 {
        warn!("token_algorithm_unsupported");
        return Err(DecodeError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<Value>(
        compact,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => {
            warn!("token_signature_mismatch");
            DecodeError::InvalidSignature
        }
        ErrorKind::InvalidAlgorithm => {
            DecodeError::UnsupportedAlgorithm(format!("{:?}", header.alg))
        }
        _ => jwt_error("payload", &e),
    })
}

/// Describe a jsonwebtoken failure without echoing token contents.
fn jwt_error(segment: &'static str, e: &JwtError) -> DecodeError {
    let reason = match e.kind() {
        ErrorKind::Base64(_) => "invalid base64url",
        ErrorKind::Json(_) => "invalid JSON",
        ErrorKind::Utf8(_) => "invalid UTF-8",
        ErrorKind::InvalidToken => "malformed token",
        _ => "rejected by validation",
    };

    DecodeError::InvalidSegment {
        segment,
        reason: reason.to_string(),
    }
}

/// Decode a base64url segment and parse it as JSON.
fn parse_segment(segment: &'static str, encoded: &str) -> Result<Value, DecodeError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| DecodeError::InvalidSegment {
            segment,
            reason: e.to_string(),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| DecodeError::InvalidSegment {
        segment,
        reason: e.to_string(),
    })
}
