//! Typed errors for the analyzer and the bus boundary.
//!
//! Application plumbing (config files, CLI I/O) uses `anyhow` instead.

/// Message returned to callers when `topN` is not positive.
pub const INVALID_TOP_N_MESSAGE: &str = "Invalid topN value. It must be a positive integer.";

/// Validation failures of a frequency request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{}", INVALID_TOP_N_MESSAGE)]
    InvalidTopN(i64),
}

/// Errors raised while receiving or dispatching bus messages.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(serde_json::Error),

    #[error("Failed to encode ack: {0}")]
    Encode(serde_json::Error),

    #[error("Message too large: {size} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("No handler subscribed to subject '{0}'")]
    NoHandler(String),

    #[error("Subject '{0}' already has a handler")]
    DuplicateSubscription(String),

    #[error("Invalid subject '{0}'")]
    InvalidSubject(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BusResult<T> = Result<T, BusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_top_n_message_matches_constant() {
        assert_eq!(
            AnalysisError::InvalidTopN(0).to_string(),
            INVALID_TOP_N_MESSAGE
        );
        assert_eq!(
            AnalysisError::InvalidTopN(-7).to_string(),
            INVALID_TOP_N_MESSAGE
        );
    }

    #[test]
    fn test_json_errors_keep_their_direction() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(BusError::MalformedEnvelope(parse)
            .to_string()
            .starts_with("Malformed envelope"));

        let encode = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        assert!(BusError::Encode(encode)
            .to_string()
            .starts_with("Failed to encode ack"));
    }

    #[test]
    fn test_bus_error_display() {
        let err = BusError::MessageTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Message too large: 2048 bytes exceeds limit of 1024 bytes"
        );
        assert!(BusError::NoHandler("word.count".to_string())
            .to_string()
            .contains("word.count"));
    }
}
