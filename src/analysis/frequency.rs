//! Word frequency analysis.
//!
//! `analyze` is a pure function of its input: it validates the request,
//! tokenizes the text, and returns the top ranked words together with the
//! full token count.

use super::aggregator::FrequencyTable;
use super::tokenizer::{normalize, tokens};
use crate::error::AnalysisError;
use crate::models::{FrequencyRequest, FrequencyResult};

/// What a request should produce once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated {
    /// The text carries no data; answer with an empty result.
    NoData,
    /// Rank the text, keeping at most this many words.
    Rank(usize),
}

/// Validate a request. Empty text is checked before `top_n`.
pub fn validate(text: Option<&str>, top_n: i64) -> Result<Validated, AnalysisError> {
    let has_data = text.is_some_and(|t| !t.trim().is_empty());
    if !has_data {
        return Ok(Validated::NoData);
    }

    if top_n <= 0 {
        return Err(AnalysisError::InvalidTopN(top_n));
    }

    Ok(Validated::Rank(usize::try_from(top_n).unwrap_or(usize::MAX)))
}

/// Analyze `text` and return its `top_n` most frequent words.
pub fn analyze(text: Option<&str>, top_n: i64) -> FrequencyResult {
    let limit = match validate(text, top_n) {
        Ok(Validated::NoData) => return FrequencyResult::empty(),
        Ok(Validated::Rank(limit)) => limit,
        Err(e) => return FrequencyResult::rejected(e.to_string()),
    };

    let normalized = normalize(text.unwrap_or_default());
    let table = FrequencyTable::from_tokens(tokens(&normalized));

    FrequencyResult::ranked(table.top(limit), table.total())
}

/// Analyze a decoded request.
pub fn analyze_request(request: &FrequencyRequest) -> FrequencyResult {
    analyze(request.text.as_deref(), request.top_n)
}
