//! Subject-based dispatch of bus messages.

use super::envelope::{Ack, Envelope};
use crate::error::{BusError, BusResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A handler subscribed to exactly one subject.
pub trait MessageHandler: Send + Sync {
    /// Subject this handler answers.
    fn subject(&self) -> &str;

    /// Handle one payload and return the reply payload.
    ///
    /// `None` means the message carried no payload. Handlers cannot decline
    /// a message: whatever they return is sent back with a positive ack.
    fn handle(&self, payload: Option<Value>) -> Value;
}

/// Routes envelopes to the handler subscribed to their subject.
#[derive(Default, Clone)]
pub struct Router {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler under its own subject.
    pub fn subscribe<H>(&mut self, handler: H) -> BusResult<()>
    where
        H: MessageHandler + 'static,
    {
        let subject = handler.subject().to_string();
        validate_subject(&subject)?;

        if self.handlers.contains_key(&subject) {
            return Err(BusError::DuplicateSubscription(subject));
        }

        debug!("Subscribed handler to {}", subject);
        self.handlers.insert(subject, Arc::new(handler));
        Ok(())
    }

    /// Subscribed subjects, sorted.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        subjects.sort_unstable();
        subjects
    }

    /// Dispatch a decoded envelope.
    pub fn dispatch(&self, envelope: Envelope) -> Ack {
        let Some(handler) = self.handlers.get(&envelope.subject) else {
            warn!("No handler for subject {}", envelope.subject);
            let err = BusError::NoHandler(envelope.subject.clone());
            return Ack::rejected(envelope.subject, envelope.reply_to, err);
        };

        let reply = handler.handle(envelope.payload.clone());
        Ack::handled(&envelope, reply)
    }

    /// Decode one raw frame and dispatch it.
    pub fn dispatch_frame(&self, frame: &[u8]) -> Ack {
        match serde_json::from_slice::<Envelope>(frame) {
            Ok(envelope) => self.dispatch(envelope),
            Err(e) => {
                warn!("Dropping malformed envelope: {}", e);
                Ack::rejected(String::new(), None, BusError::MalformedEnvelope(e))
            }
        }
    }
}

/// Subjects are dot-separated, non-empty tokens without whitespace or wildcards.
pub fn validate_subject(subject: &str) -> BusResult<()> {
    let valid = !subject.is_empty()
        && subject.split('.').all(|token| {
            !token.is_empty()
                && !token
                    .chars()
                    .any(|c| c.is_whitespace() || c == '*' || c == '>')
        });

    if valid {
        Ok(())
    } else {
        Err(BusError::InvalidSubject(subject.to_string()))
    }
}
