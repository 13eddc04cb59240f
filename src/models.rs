//! Data models for word frequency requests and results.
//!
//! These types double as the wire shapes of the `word.frequency`
//! subject, so field names follow the camelCase JSON contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject the frequency handler subscribes to.
pub const WORD_FREQUENCY_SUBJECT: &str = "word.frequency";

/// An incoming request to rank the words of a block of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRequest {
    /// Text to analyze. May be absent, empty, or whitespace-only.
    #[serde(default)]
    pub text: Option<String>,
    /// Maximum number of ranked entries to return.
    ///
    /// Signed so that non-positive values reach validation instead of
    /// failing deserialization. Missing on the wire means `0`.
    #[serde(default)]
    pub top_n: i64,
}

impl FrequencyRequest {
    /// Creates a request for the given text.
    pub fn new(text: impl Into<String>, top_n: i64) -> Self {
        Self {
            text: Some(text.into()),
            top_n,
        }
    }
}

/// A normalized word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordCount {
    /// Lowercase ASCII alphanumeric token.
    pub word: String,
    /// Occurrences within one request's text.
    pub count: usize,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: usize) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.word, self.count)
    }
}

/// Outcome of one frequency analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyResult {
    /// Ranked words, most frequent first, ties broken by ascending word.
    #[serde(rename = "wordFrequencies", default)]
    pub ranked_words: Vec<WordCount>,
    /// Number of tokens in the full text, not just the ranked ones.
    #[serde(default)]
    pub total_words: usize,
    /// Validation error, if the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FrequencyResult {
    /// Result for text that holds no data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result carrying a validation error and nothing else.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Result holding ranked words and the untruncated token count.
    pub fn ranked(ranked_words: Vec<WordCount>, total_words: usize) -> Self {
        Self {
            ranked_words,
            total_words,
            error: None,
        }
    }

    /// Returns true if the request was rejected.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of distinct words in the ranking.
    pub fn len(&self) -> usize {
        self.ranked_words.len()
    }

    /// Returns true if no words were ranked.
    pub fn is_empty(&self) -> bool {
        self.ranked_words.is_empty()
    }
}
