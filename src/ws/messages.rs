//! WebSocket wire types.
//!
//! Inbound frames carry `{ "event": string, "payload"?: any }`; the only
//! frame the router writes itself is `{ "event": string, "data": string }`
//! where `data` is the JSON-encoded payload of the answering set event.
//! The `payload`/`data` asymmetry is part of the wire contract.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Message received from a client socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Colon-delimited event name. Absent events are ignored by the router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Opaque payload, passed through unvalidated. An explicit `null` is
    /// `Some(Value::Null)`; only an absent key is `None`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<Value>,
    /// Any other top-level fields, kept so passthrough subscribers see the
    /// message as the client sent it.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundMessage {
    /// Builds a message with the given event and no payload.
    #[must_use]
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            payload: None,
            extra: Map::new(),
        }
    }

    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the frame is not a JSON object or
    /// `event` is present but not a string.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Maps any present value, `null` included, to `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Message the router writes back to a socket when a set event answers a
/// data request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The set event name.
    pub event: String,
    /// JSON-encoded payload of the set event.
    pub data: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_event_and_payload() {
        let Ok(msg) = InboundMessage::from_json(
            r#"{ "event": "data:new:person", "payload": { "name": "daniel" } }"#,
        ) else {
            panic!("parse failed");
        };
        assert_eq!(msg.event.as_deref(), Some("data:new:person"));
        assert_eq!(msg.payload, Some(json!({ "name": "daniel" })));
        assert!(msg.extra.is_empty());
    }

    #[test]
    fn missing_event_is_none() {
        let Ok(msg) = InboundMessage::from_json(r#"{ "payload": 1 }"#) else {
            panic!("parse failed");
        };
        assert!(msg.event.is_none());
    }

    #[test]
    fn explicit_null_payload_survives_round_trip() {
        let Ok(msg) = InboundMessage::from_json(r#"{"event":"e","payload":null}"#) else {
            panic!("parse failed");
        };
        assert_eq!(msg.payload, Some(Value::Null));
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(value, json!({ "event": "e", "payload": null }));
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let Ok(msg) = InboundMessage::from_json(r#"{ "event": "a:b", "id": 9 }"#) else {
            panic!("parse failed");
        };
        assert_eq!(msg.extra.get("id"), Some(&json!(9)));
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(value, json!({ "event": "a:b", "id": 9 }));
    }

    #[test]
    fn rejects_non_objects_and_bad_event_types() {
        assert!(InboundMessage::from_json("not json").is_err());
        assert!(InboundMessage::from_json("[1, 2]").is_err());
        assert!(InboundMessage::from_json(r#"{ "event": 5 }"#).is_err());
    }

    #[test]
    fn outbound_uses_data_field() {
        let out = OutboundMessage {
            event: "data:set:test".to_string(),
            data: r#"{"a":1}"#.to_string(),
        };
        let value = serde_json::to_value(&out).unwrap_or_default();
        assert_eq!(
            value,
            json!({ "event": "data:set:test", "data": "{\"a\":1}" })
        );
    }
}
