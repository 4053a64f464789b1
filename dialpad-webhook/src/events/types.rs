//! Event records extracted from Dialpad claims.

use crate::claims::{Claims, ClaimsError};

/// A call has started ringing or connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStarted {
    pub call_id: String,
    pub from_number: String,
    pub to_number: String,
}

/// A call has ended (`call_ended` or `hungup`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEnded {
    pub call_id: String,
    /// Call length as reported by Dialpad
    pub duration: i64,
}

/// An SMS or chat message arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceived {
    pub message_id: String,
    pub content: String,
}

impl CallStarted {
    pub fn from_claims(claims: &Claims) -> Result<Self, ClaimsError> {
        Ok(Self {
            call_id: claims.data_str("call_id")?.to_string(),
            from_number: claims.data_str("from_number")?.to_string(),
            to_number: claims.data_str("to_number")?.to_string(),
        })
    }
}

impl CallEnded {
    pub fn from_claims(claims: &Claims) -> Result<Self, ClaimsError> {
        Ok(Self {
            call_id: claims.data_str("call_id")?.to_string(),
            duration: claims.data_i64("duration")?,
        })
    }
}

impl MessageReceived {
    pub fn from_claims(claims: &Claims) -> Result<Self, ClaimsError> {
        Ok(Self {
            message_id: claims.data_str("message_id")?.to_string(),
            content: claims.data_str("content")?.to_string(),
        })
    }
}
