//! The `word.frequency` subscription.

use super::router::MessageHandler;
use crate::analysis::analyze_request;
use crate::models::{FrequencyRequest, FrequencyResult, WORD_FREQUENCY_SUBJECT};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Answers word frequency requests.
///
/// Every message is acknowledged. Validation and decode problems are
/// reported through the result's `error` field.
#[derive(Debug, Clone)]
pub struct WordFrequencyHandler {
    subject: String,
}

impl Default for WordFrequencyHandler {
    fn default() -> Self {
        Self::new(WORD_FREQUENCY_SUBJECT)
    }
}

impl WordFrequencyHandler {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Decode the payload and analyze it.
    pub fn answer(&self, payload: Option<Value>) -> FrequencyResult {
        let request = match payload {
            None | Some(Value::Null) => FrequencyRequest::default(),
            Some(value) => match serde_json::from_value::<FrequencyRequest>(value) {
                Ok(request) => request,
                Err(e) => {
                    debug!("Undecodable {} payload: {}", self.subject, e);
                    return FrequencyResult::rejected(format!("Invalid request payload: {}", e));
                }
            },
        };

        let start = Instant::now();
        let result = analyze_request(&request);

        match result.error {
            Some(ref error) => debug!("Rejected {} request: {}", self.subject, error),
            None => {
                info!("Handled {} request", self.subject);
                debug!(
                    "Ranked {} of {} words in {:?}",
                    result.ranked_words.len(),
                    result.total_words,
                    start.elapsed()
                );
            }
        }

        result
    }
}

impl MessageHandler for WordFrequencyHandler {
    fn subject(&self) -> &str {
        &self.subject
    }

    fn handle(&self, payload: Option<Value>) -> Value {
        let result = self.answer(payload);
        // Serializing plain structs of strings and integers cannot fail.
        serde_json::to_value(&result).unwrap_or(Value::Null)
    }
}
