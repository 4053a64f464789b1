//! Event dispatch for decoded webhook claims.
//!
//! The `state` claim selects a handler; each handler pulls its fields out
//! of `data` and records the event. Nothing is persisted yet, handlers are
//! the place to hook storage or notifications in.
//!
//! ## Dispatch Flow
//!
//! ```text
//! Claims → state → EventKind → from_claims() → handle_event()
//! ```

pub mod types;

use tracing::{info, warn};

use crate::claims::{Claims, ClaimsError};

pub use types::{CallEnded, CallStarted, MessageReceived};

/// Event type named by the `state` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CallStarted,
    CallEnded,
    MessageReceived,
    Unhandled(String),
}

impl EventKind {
    pub fn from_state(state: &str) -> Self {
        match state {
            "call_started" => EventKind::CallStarted,
            "call_ended" | "hungup" => EventKind::CallEnded,
            "message_received" => EventKind::MessageReceived,
            other => EventKind::Unhandled(other.to_string()),
        }
    }

    /// Name safe to log; unhandled states come from the token and are not echoed.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::CallStarted => "call_started",
            EventKind::CallEnded => "call_ended",
            EventKind::MessageReceived => "message_received",
            EventKind::Unhandled(_) => "unhandled",
        }
    }
}

/// A recognised event with its extracted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CallStarted(CallStarted),
    CallEnded(CallEnded),
    MessageReceived(MessageReceived),
}

/// Outcome of dispatching one set of claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub kind: EventKind,
    /// `None` for unhandled kinds or when extraction failed
    pub event: Option<Event>,
}

/// Route claims to the handler for their event type.
///
/// Fails only when there is no usable `state`. Extraction problems inside
/// a handler are logged and do not fail the request.
pub fn dispatch(claims: &Claims) -> Result<Dispatched, ClaimsError> {
    let kind = EventKind::from_state(claims.state()?);

    info!(event_type = kind.label(), "webhook_routing");

    let extracted = match &kind {
        EventKind::CallStarted => CallStarted::from_claims(claims).map(Event::CallStarted),
        EventKind::CallEnded => CallEnded::from_claims(claims).map(Event::CallEnded),
        EventKind::MessageReceived => {
            MessageReceived::from_claims(claims).map(Event::MessageReceived)
        }
        EventKind::Unhandled(state) => {
            info!(state_length = state.len(), "webhook_event_unhandled");
            return Ok(Dispatched { kind, event: None });
        }
    };

    let event = match extracted {
        Ok(event) => {
            handle_event(&event);
            Some(event)
        }
        Err(e) => {
            warn!(
                event_type = kind.label(),
                error = %e,
                "webhook_event_extraction_failed"
            );
            None
        }
    };

    Ok(Dispatched { kind, event })
}

/// Record an extracted event. Field values stay out of the logs.
fn handle_event(event: &Event) {
    match event {
        Event::CallStarted(call) => {
            info!(
                call_id_length = call.call_id.len(),
                from_number_length = call.from_number.len(),
                to_number_length = call.to_number.len(),
                "call_started"
            );
        }
        Event::CallEnded(call) => {
            info!(call_id_length = call.call_id.len(), "call_ended");
        }
        Event::MessageReceived(message) => {
            info!(
                message_id_length = message.message_id.len(),
                content_length = message.content.len(),
                "message_received"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use serde_json::json;

    #[test]
    fn test_event_kind_from_state() {
        assert_eq!(EventKind::from_state("call_started"), EventKind::CallStarted);
        assert_eq!(EventKind::from_state("call_ended"), EventKind::CallEnded);
        assert_eq!(EventKind::from_state("hungup"), EventKind::CallEnded);
        assert_eq!(
            EventKind::from_state("message_received"),
            EventKind::MessageReceived
        );
        assert_eq!(
            EventKind::from_state("voicemail"),
            EventKind::Unhandled("voicemail".to_string())
        );
    }

    #[test]
    fn test_dispatch_call_started() {
        let claims = Claims::new(json!({
            "state": "call_started",
            "data": {"call_id": "c1", "from_number": "+1", "to_number": "+2"}
        }));

        let dispatched = dispatch(&claims).unwrap();

        assert_eq!(dispatched.kind, EventKind::CallStarted);
        assert_eq!(
            dispatched.event,
            Some(Event::CallStarted(CallStarted {
                call_id: "c1".to_string(),
                from_number: "+1".to_string(),
                to_number: "+2".to_string(),
            }))
        );
    }

    #[test]
    fn test_dispatch_hungup() {
        let claims = Claims::new(json!({
            "state": "hungup",
            "data": {"call_id": "c2", "duration": 95}
        }));

        let dispatched = dispatch(&claims).unwrap();

        assert_eq!(dispatched.kind, EventKind::CallEnded);
        assert_eq!(
            dispatched.event,
            Some(Event::CallEnded(CallEnded {
                call_id: "c2".to_string(),
                duration: 95,
            }))
        );
    }

    #[test]
    fn test_dispatch_message_received() {
        let claims = Claims::new(json!({
            "state": "message_received",
            "data": {"message_id": "m1", "content": "hello"}
        }));

        let dispatched = dispatch(&claims).unwrap();

        assert!(matches!(dispatched.event, Some(Event::MessageReceived(_))));
    }

    #[test]
    fn test_dispatch_unhandled_is_not_an_error() {
        let claims = Claims::new(json!({"state": "voicemail", "data": {}}));

        let dispatched = dispatch(&claims).unwrap();

        assert_eq!(dispatched.kind, EventKind::Unhandled("voicemail".to_string()));
        assert_eq!(dispatched.event, None);
    }

    #[test]
    fn test_dispatch_extraction_failure_continues() {
        let claims = Claims::new(json!({"state": "call_started", "data": {}}));

        let dispatched = dispatch(&claims).unwrap();

        assert_eq!(dispatched.kind, EventKind::CallStarted);
        assert_eq!(dispatched.event, None);
    }

    #[test]
    fn test_dispatch_missing_state() {
        let claims = Claims::new(json!({"data": {}}));
        assert_eq!(
            dispatch(&claims),
            Err(ClaimsError::MissingField("state".to_string()))
        );
    }

    #[test]
    fn test_dispatch_logs_no_claim_values() {
        let events = [
            json!({
                "state": "call_started",
                "data": {
                    "call_id": "call-7f3a",
                    "from_number": "+15551234567",
                    "to_number": "+15557654321"
                }
            }),
            json!({"state": "hungup", "data": {"call_id": "call-7f3a", "duration": 4821}}),
            json!({
                "state": "message_received",
                "data": {"message_id": "msg-91c2", "content": "meet at noon"}
            }),
            json!({"state": "secret-state-9d1e", "data": {}}),
        ];

        for event in events {
            let (dispatched, logs) = capture_logs(|| dispatch(&Claims::new(event)));

            assert!(dispatched.is_ok());
            assert!(!logs.is_empty());
            for value in [
                "call-7f3a",
                "15551234567",
                "15557654321",
                "4821",
                "msg-91c2",
                "meet at noon",
                "secret-state-9d1e",
            ] {
                assert!(!logs.contains(value), "log leaked {}: {}", value, logs);
            }
        }
    }
}
