//! Decoded token claims.
//!
//! Dialpad payloads are loosely shaped, so the claim set is kept as a
//! generic JSON value and read through accessors that report shape
//! mismatches as [`ClaimsError`].

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Shape mismatch while reading a claim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("claims are not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// The claim set carried by a webhook token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Value);

impl Claims {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_object(&self) -> Result<&Map<String, Value>, ClaimsError> {
        self.0.as_object().ok_or(ClaimsError::NotAnObject)
    }

    /// The event type, read from the top-level `state` claim.
    pub fn state(&self) -> Result<&str, ClaimsError> {
        let value = self
            .as_object()?
            .get("state")
            .ok_or_else(|| ClaimsError::MissingField("state".to_string()))?;

        value.as_str().ok_or_else(|| ClaimsError::WrongType {
            field: "state".to_string(),
            expected: "a string",
        })
    }

    /// A string field under `data`.
    pub fn data_str(&self, key: &str) -> Result<&str, ClaimsError> {
        self.data_field(key)?
            .as_str()
            .ok_or_else(|| ClaimsError::WrongType {
                field: format!("data.{}", key),
                expected: "a string",
            })
    }

    /// An integer field under `data`.
    pub fn data_i64(&self, key: &str) -> Result<i64, ClaimsError> {
        self.data_field(key)?
            .as_i64()
            .ok_or_else(|| ClaimsError::WrongType {
                field: format!("data.{}", key),
                expected: "an integer",
            })
    }

    fn data_field(&self, key: &str) -> Result<&Value, ClaimsError> {
        let data = self
            .as_object()?
            .get("data")
            .ok_or_else(|| ClaimsError::MissingField("data".to_string()))?
            .as_object()
            .ok_or_else(|| ClaimsError::WrongType {
                field: "data".to_string(),
                expected: "an object",
            })?;

        data.get(key)
            .ok_or_else(|| ClaimsError::MissingField(format!("data.{}", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call_ended() -> Claims {
        Claims::new(json!({
            "state": "hungup",
            "data": {"call_id": "c9", "duration": 42, "rate": 1.5}
        }))
    }

    #[test]
    fn test_state() {
        assert_eq!(call_ended().state(), Ok("hungup"));
    }

    #[test]
    fn test_state_missing() {
        let claims = Claims::new(json!({"data": {}}));
        assert_eq!(
            claims.state(),
            Err(ClaimsError::MissingField("state".to_string()))
        );
    }

    #[test]
    fn test_state_not_a_string() {
        let claims = Claims::new(json!({"state": 7}));
        assert!(matches!(claims.state(), Err(ClaimsError::WrongType { .. })));
    }

    #[test]
    fn test_not_an_object() {
        let claims = Claims::new(json!(["state", "call_started"]));
        assert_eq!(claims.state(), Err(ClaimsError::NotAnObject));
        assert_eq!(claims.data_str("call_id"), Err(ClaimsError::NotAnObject));
    }

    #[test]
    fn test_data_accessors() {
        let claims = call_ended();
        assert_eq!(claims.data_str("call_id"), Ok("c9"));
        assert_eq!(claims.data_i64("duration"), Ok(42));
    }

    #[test]
    fn test_data_wrong_types() {
        let claims = call_ended();
        assert_eq!(
            claims.data_i64("rate"),
            Err(ClaimsError::WrongType {
                field: "data.rate".to_string(),
                expected: "an integer",
            })
        );
        assert!(matches!(
            claims.data_str("duration"),
            Err(ClaimsError::WrongType { .. })
        ));
    }

    #[test]
    fn test_data_missing() {
        let claims = call_ended();
        assert_eq!(
            claims.data_str("to_number"),
            Err(ClaimsError::MissingField("data.to_number".to_string()))
        );

        let bare = Claims::new(json!({"state": "call_started"}));
        assert_eq!(
            bare.data_str("call_id"),
            Err(ClaimsError::MissingField("data".to_string()))
        );
    }

    #[test]
    fn test_serializes_transparently() {
        let claims = call_ended();
        let encoded = serde_json::to_value(&claims).unwrap();
        assert_eq!(&encoded, claims.as_value());
    }
}
