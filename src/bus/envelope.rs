//! Wire frames exchanged on the bus.
//!
//! Each frame is a single JSON object on its own line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inbound message addressed to a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub subject: String,
    /// Correlation token echoed back on the ack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[cfg(test)]
impl Envelope {
    pub fn new(subject: impl Into<String>, payload: Value) -> Self {
        Self {
            subject: subject.into(),
            reply_to: None,
            payload: Some(payload),
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// The outbound acknowledgment for one envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub ack: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Transport-level failure. Validation problems travel in the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub handled_at: DateTime<Utc>,
}

impl Ack {
    /// A positive acknowledgment carrying the handler's reply payload.
    ///
    /// A message that reached its handler is always acked.
    pub fn handled(envelope: &Envelope, payload: Value) -> Self {
        Self {
            subject: envelope.subject.clone(),
            reply_to: envelope.reply_to.clone(),
            ack: true,
            payload: Some(payload),
            error: None,
            handled_at: Utc::now(),
        }
    }

    /// A negative acknowledgment for a message that was never handled.
    pub fn rejected(subject: impl Into<String>, reply_to: Option<String>, error: impl ToString) -> Self {
        Self {
            subject: subject.into(),
            reply_to,
            ack: false,
            payload: None,
            error: Some(error.to_string()),
            handled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"subject":"word.frequency","replyTo":"r-1","payload":{"text":"hi","topN":1}}"#,
        )
        .unwrap();

        assert_eq!(envelope.subject, "word.frequency");
        assert_eq!(envelope.reply_to.as_deref(), Some("r-1"));
        assert_eq!(envelope.payload, Some(json!({"text": "hi", "topN": 1})));
    }

    #[test]
    fn test_envelope_payload_optional() {
        let envelope: Envelope = serde_json::from_str(r#"{"subject":"word.frequency"}"#).unwrap();
        assert_eq!(envelope.payload, None);
        assert_eq!(envelope.reply_to, None);
    }

    #[test]
    fn test_ack_echoes_reply_to() {
        let envelope = Envelope::new("word.frequency", json!({})).with_reply_to("abc");
        let ack = Ack::handled(&envelope, json!({"totalWords": 0}));

        assert!(ack.ack);
        assert_eq!(ack.reply_to.as_deref(), Some("abc"));

        let value = serde_json::to_value(&ack).unwrap();
        assert_eq!(value["replyTo"], "abc");
        assert_eq!(value["payload"]["totalWords"], 0);
        assert!(value.get("error").is_none());
        assert!(value.get("handledAt").is_some());
    }

    #[test]
    fn test_rejected_ack() {
        let ack = Ack::rejected("nope", None, "No handler");
        assert!(!ack.ack);
        assert_eq!(ack.error.as_deref(), Some("No handler"));
        assert_eq!(ack.payload, None);
    }
}
