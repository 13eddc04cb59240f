//! Word frequency analysis.
//!
//! Tokenization, aggregation, and the validating `analyze` entry point.

pub mod aggregator;
pub mod frequency;
pub mod tokenizer;

pub use frequency::analyze_request;
